mod file_storage;
pub mod html_utils;
pub mod keys;
pub mod locator;
mod models;

pub(crate) use file_storage::{list_files, read_optional, tmp_path_for};
pub use file_storage::{load_list, save_list, write_atomic, CourseStore, StudyStorage};
pub use locator::locate_base_directory;
pub use models::*;
