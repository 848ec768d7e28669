/// Version-control adapters
mod git_lister;

pub use git_lister::GitTrackedFileLister;
