pub mod batch;
pub mod record;
pub mod storage_target;
