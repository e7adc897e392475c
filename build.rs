use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=res/*");
    println!("cargo:rerun-if-changed=config/*");

    // OUT_DIR is target/<profile>/build/<pkg>/out, put the assets next to the binary
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let Some(profile_dir) = out_dir.ancestors().nth(3) else {
        return Ok(());
    };
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let paths_to_copy: Vec<PathBuf> = ["res", "config"]
        .iter()
        .map(|dir| manifest_dir.join(dir))
        .filter(|dir| dir.exists())
        .collect();
    if !paths_to_copy.is_empty() {
        copy_items(&paths_to_copy, profile_dir, &copy_options)?;
    }

    Ok(())
}
