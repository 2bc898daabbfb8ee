use std::fs;
use std::path::{Path, PathBuf};

use depscope::{FileNode, Repository};

/// Path of the file at `index` within `layer`
pub fn layered_path(layer: usize, index: usize) -> String {
    format!("layer{}/mod{}.py", layer, index)
}

/// Generate a layered repository for performance testing
///
/// Every file in layer `l` imports two files of layer `l + 1`, so a file in
/// the last layer is depended on by files in every layer above it, each at a
/// distance equal to the layer gap.
///
/// # Arguments
///
/// * `layers` - Number of layers
/// * `width` - Number of files in each layer
pub fn generate_layered_repository(layers: usize, width: usize) -> Repository {
    let mut files = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for index in 0..width {
            let mut file = FileNode::new(layered_path(layer, index), "").expect("valid file");
            if layer + 1 < layers {
                file = file.with_imports([
                    format!("layer{}.mod{}", layer + 1, index),
                    format!("layer{}.mod{}", layer + 1, (index + 1) % width),
                ]);
            }
            files.push(file);
        }
    }

    Repository::new("/generated", files)
        .expect("unique paths")
        .with_name("layered")
}

/// Generate a chain `f0 -> f1 -> ... -> f{len-1}`, closed into one cycle if asked
pub fn generate_chain_repository(len: usize, closed: bool) -> Repository {
    let files = (0..len)
        .map(|i| {
            let file = FileNode::new(format!("f{}.py", i), "").expect("valid file");
            if i + 1 < len {
                file.with_imports([format!("f{}", i + 1)])
            } else if closed {
                file.with_imports(["f0"])
            } else {
                file
            }
        })
        .collect();

    Repository::new("/generated", files)
        .expect("unique paths")
        .with_name("chain")
}

/// Write a repository description as JSON into `dir`
pub fn write_repository_json(dir: &Path, repository: &Repository) -> PathBuf {
    let path = dir.join(format!("{}.json", repository.name));
    fs::write(&path, serde_json::to_string_pretty(repository).expect("serializable"))
        .expect("writable temp dir");
    path
}
