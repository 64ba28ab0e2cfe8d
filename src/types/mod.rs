pub mod dto;
pub mod query;
pub mod tencent;
