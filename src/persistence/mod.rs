pub mod files;
pub mod migration;
pub mod slots;
pub mod storage;

pub use files::{atomic_write, data_dir, ensure_dir, find_local_data_dir, init_local_data_dir, read_file, DATA_DIR_NAME};
pub use migration::CURRENT_VERSION;
pub use slots::Slot;
pub use storage::{load_slot, save_slot, FileStorage, MemoryStorage, SlotStorage};
