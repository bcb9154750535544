//! List the posts a build would convert

use anyhow::Result;
use std::io::Write;

use crate::Site;

/// Print every discovered post and the page it becomes
pub fn run<W: Write>(site: &Site, out: &mut W) -> Result<()> {
    let posts = site.posts()?;

    writeln!(out, "Posts ({}):", posts.len())?;
    for post in posts {
        writeln!(
            out,
            "  {} -> {}",
            post.file_name,
            site.posts_output_dir
                .join(post.output_file_name(&site.config.output_extension))
                .display()
        )?;
    }

    Ok(())
}
