use common::vec2::Vec2;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

fn with_suffix(input: &Path, suffix: &str) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

pub fn centres_path(input: &Path) -> PathBuf {
    with_suffix(input, ".cluster_centres")
}

pub fn membership_path(input: &Path) -> PathBuf {
    with_suffix(input, ".membership")
}

fn write_centres<W: Write>(mut writer: W, centroids: &Vec2<f32>) -> std::io::Result<()> {
    for (i, centroid) in centroids.rows().enumerate() {
        write!(writer, "{i}")?;
        for x in centroid {
            write!(writer, " {x:.6}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

fn write_membership<W: Write>(mut writer: W, membership: &[usize]) -> std::io::Result<()> {
    for (i, cluster) in membership.iter().enumerate() {
        writeln!(writer, "{i} {cluster}")?;
    }
    writer.flush()
}

/// Writes `<input>.cluster_centres` and `<input>.membership` next to the input file.
pub fn write_results(
    input: &Path,
    centroids: &Vec2<f32>,
    membership: &[usize],
) -> std::io::Result<()> {
    let path = centres_path(input);
    info!(
        "writing coordinates of {} cluster centers to {}",
        centroids.shape_0(),
        path.display()
    );
    write_centres(BufWriter::new(File::create(&path)?), centroids)?;
    let path = membership_path(input);
    info!(
        "writing membership of {} objects to {}",
        membership.len(),
        path.display()
    );
    write_membership(BufWriter::new(File::create(&path)?), membership)?;
    Ok(())
}
