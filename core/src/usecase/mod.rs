pub mod topic_progress;
