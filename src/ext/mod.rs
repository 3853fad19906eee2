mod system_time_ext;

pub use system_time_ext::local_modified_time;
