/// Network adapters for the static-analysis service and the metrics collector
mod endpoint;
mod pushgateway_client;
mod sonarqube_client;

pub use pushgateway_client::PushgatewayClient;
pub use sonarqube_client::SonarQubeClient;
