//! User workspace directory materialization.

use std::fs;
use std::path::Path;

use tracing::debug;

use dtaas_core::error::Result;

/// Instantiate each user's workspace from `<base_path>/template`.
///
/// The copy merges into any pre-existing directory: files already
/// present at the destination are left untouched, new template files
/// are added. Repeated invocation is the expected steady state, not an
/// error.
pub fn create_user_files(users: &[String], base_path: &Path) -> Result<()> {
    let template_dir = base_path.join("template");
    for username in users {
        let user_dir = base_path.join(username);
        debug!("Materializing workspace {}", user_dir.display());
        copy_tree(&template_dir, &user_dir)?;
    }
    Ok(())
}

fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else if !target.exists() {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
