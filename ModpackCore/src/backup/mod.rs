//! Save file backups
//!
//! The game stores each profile slot as `<data>/<slot>/save.jkr`. Backups are
//! plain copies in `<data>/<slot>/autosave`, named by timestamp.

mod auto;
mod saves;

pub use auto::AutoBackup;
pub use saves::{BACKUP_FOLDER, DEFAULT_SLOT, SAVE_EXTENSION, SAVE_FILE, SaveBackups};
