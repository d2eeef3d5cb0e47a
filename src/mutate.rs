use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::error::HarnessError;
use crate::naming::{DEFAULT_NAME_LENGTH, random_name};

/// Resource types whose cloud-visible names collide across concurrent test
/// runs unless randomized.
pub const DEFAULT_TARGET_TYPES: &[&str] = &["azurerm_resource_group", "azurerm_storage_account"];

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One renamed resource instance.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenamedResource {
    pub resource_type: String,
    pub logical_id: String,
    pub new_name: String,
}

/// Everything the mutator changed in one pass over a configuration file.
#[derive(Debug, Serialize)]
pub struct MutationSummary {
    pub file: String,
    pub renamed: Vec<RenamedResource>,
}

impl MutationSummary {
    pub fn is_noop(&self) -> bool {
        self.renamed.is_empty()
    }
}

/// Randomizes the `"name"` field of every targeted resource instance in the
/// given `cdk.tf.json` file, rewriting the file in place.
pub fn randomize_unique_resources(
    path: &Path,
    target_types: &[&str],
) -> Result<MutationSummary, HarnessError> {
    randomize_unique_resources_with(path, target_types, DEFAULT_NAME_LENGTH, &mut rand::rng())
}

/// [`randomize_unique_resources`] with an explicit name length and random
/// source, for reproducible runs.
pub fn randomize_unique_resources_with<R: Rng>(
    path: &Path,
    target_types: &[&str],
    name_length: usize,
    rng: &mut R,
) -> Result<MutationSummary, HarnessError> {
    let source = fs::read_to_string(path).map_err(|error| HarnessError::io(path, error))?;
    let mut tree: Value =
        serde_json::from_str(&source).map_err(|error| HarnessError::parse(path, error))?;

    if !tree.is_object() {
        return Err(HarnessError::NotAnObject {
            path: path.display().to_string(),
        });
    }

    let mut renamed = Vec::new();
    rewrite_tree(&mut tree, target_types, name_length, rng, &mut renamed);

    if !renamed.is_empty() {
        let rendered = serde_json::to_string_pretty(&tree)
            .map_err(|error| HarnessError::parse(path, error))?;
        write_text_atomically(path, &rendered)?;
    }

    Ok(MutationSummary {
        file: path.display().to_string(),
        renamed,
    })
}

/// Walks the whole tree. Wherever a key matches a targeted resource type and
/// holds an object of instances, every instance carrying a string `"name"`
/// gets a fresh random name. Nothing else in the tree is touched.
fn rewrite_tree<R: Rng>(
    value: &mut Value,
    target_types: &[&str],
    name_length: usize,
    rng: &mut R,
    renamed: &mut Vec<RenamedResource>,
) {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if target_types.contains(&key.as_str()) {
                    rename_instances(key, child, name_length, rng, renamed);
                }
                rewrite_tree(child, target_types, name_length, rng, renamed);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                rewrite_tree(item, target_types, name_length, rng, renamed);
            }
        }
        _ => {}
    }
}

fn rename_instances<R: Rng>(
    resource_type: &str,
    block: &mut Value,
    name_length: usize,
    rng: &mut R,
    renamed: &mut Vec<RenamedResource>,
) {
    let Value::Object(instances) = block else {
        return;
    };

    for (logical_id, instance) in instances.iter_mut() {
        let Value::Object(fields) = instance else {
            continue;
        };
        if let Some(name) = fields.get_mut("name")
            && name.is_string()
        {
            let new_name = random_name(rng, name_length);
            *name = Value::String(new_name.clone());
            renamed.push(RenamedResource {
                resource_type: resource_type.to_string(),
                logical_id: logical_id.clone(),
                new_name,
            });
        }
    }
}

/// In-place rewrite through an adjacent temp file plus rename, so a crashed
/// run never leaves a half-written stack configuration behind.
fn write_text_atomically(path: &Path, contents: &str) -> Result<(), HarnessError> {
    let (temp_path, mut temp_file) = create_temp_file_adjacent(path)?;

    let result = (|| {
        temp_file
            .write_all(contents.as_bytes())
            .map_err(|error| HarnessError::io(&temp_path, error))?;
        drop(temp_file);
        fs::rename(&temp_path, path).map_err(|error| HarnessError::io(path, error))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn create_temp_file_adjacent(path: &Path) -> Result<(PathBuf, File), HarnessError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("cdk.tf.json");

    for _ in 0..64 {
        let counter = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_nanos());
        let temp_path = parent.join(format!(".{file_name}.cdkharness-tmp-{nanos}-{counter}"));

        match OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)
        {
            Ok(file) => return Ok((temp_path, file)),
            Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => continue,
            Err(error) => return Err(HarnessError::io(&temp_path, error)),
        }
    }

    Err(HarnessError::io(
        path,
        std::io::Error::other("failed to allocate an adjacent temporary file"),
    ))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::{Value, json};

    use super::{DEFAULT_TARGET_TYPES, randomize_unique_resources_with};
    use crate::error::HarnessError;
    use crate::naming::NAME_ALPHABET;

    fn write_config(value: &Value) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("cdk.tf.json");
        fs::write(&path, serde_json::to_string_pretty(value).expect("fixture should render"))
            .expect("fixture write should succeed");
        (dir, path)
    }

    fn sample_config() -> Value {
        json!({
            "terraform": { "required_providers": { "azurerm": { "version": "3.71.0" } } },
            "provider": { "azurerm": [ { "features": {} } ] },
            "resource": {
                "azurerm_resource_group": {
                    "testrg": { "name": "fixed-rg-name", "location": "eastus" }
                },
                "azurerm_storage_account": {
                    "teststorage": {
                        "name": "fixedstorage",
                        "resource_group_name": "${azurerm_resource_group.testrg.name}",
                        "account_tier": "Standard"
                    }
                },
                "azurerm_virtual_network": {
                    "testvnet": { "name": "keep-this-name", "address_space": ["10.0.0.0/16"] }
                }
            }
        })
    }

    #[test]
    fn targeted_instances_are_renamed_and_nothing_else_changes() {
        let (_dir, path) = write_config(&sample_config());

        let summary = randomize_unique_resources_with(
            &path,
            DEFAULT_TARGET_TYPES,
            10,
            &mut StdRng::seed_from_u64(42),
        )
        .expect("mutation should succeed");

        assert_eq!(summary.renamed.len(), 2);
        for entry in &summary.renamed {
            assert_eq!(entry.new_name.len(), 10);
            assert!(entry.new_name.bytes().all(|byte| NAME_ALPHABET.contains(&byte)));
        }

        let mutated: Value = serde_json::from_str(
            &fs::read_to_string(&path).expect("mutated file should be readable"),
        )
        .expect("mutated file should stay valid JSON");

        let rg_name = &mutated["resource"]["azurerm_resource_group"]["testrg"]["name"];
        assert_ne!(rg_name, "fixed-rg-name");

        let storage_name = &mutated["resource"]["azurerm_storage_account"]["teststorage"]["name"];
        assert_ne!(storage_name, "fixedstorage");

        // Untargeted resources and sibling fields are untouched.
        assert_eq!(
            mutated["resource"]["azurerm_virtual_network"]["testvnet"]["name"],
            "keep-this-name"
        );
        assert_eq!(
            mutated["resource"]["azurerm_resource_group"]["testrg"]["location"],
            "eastus"
        );
        assert_eq!(
            mutated["resource"]["azurerm_storage_account"]["teststorage"]["resource_group_name"],
            "${azurerm_resource_group.testrg.name}"
        );
        assert_eq!(mutated["provider"], sample_config()["provider"]);
    }

    #[test]
    fn each_instance_receives_its_own_name() {
        let config = json!({
            "resource": {
                "azurerm_resource_group": {
                    "first": { "name": "a" },
                    "second": { "name": "b" }
                }
            }
        });
        let (_dir, path) = write_config(&config);

        let summary = randomize_unique_resources_with(
            &path,
            &["azurerm_resource_group"],
            10,
            &mut StdRng::seed_from_u64(1),
        )
        .expect("mutation should succeed");

        assert_eq!(summary.renamed.len(), 2);
        assert_ne!(summary.renamed[0].new_name, summary.renamed[1].new_name);
    }

    #[test]
    fn absent_target_type_is_a_noop_that_preserves_the_file() {
        let config = json!({
            "resource": {
                "azurerm_virtual_network": { "testvnet": { "name": "keep" } }
            }
        });
        let (_dir, path) = write_config(&config);
        let before = fs::read_to_string(&path).expect("fixture should be readable");

        let summary = randomize_unique_resources_with(
            &path,
            DEFAULT_TARGET_TYPES,
            10,
            &mut StdRng::seed_from_u64(3),
        )
        .expect("no-op mutation should succeed");

        assert!(summary.is_noop());
        let after = fs::read_to_string(&path).expect("file should still be readable");
        assert_eq!(before, after, "no-op must not rewrite the file");
    }

    #[test]
    fn targeted_blocks_nested_in_arrays_and_modules_are_found() {
        let config = json!({
            "module": {
                "network": [
                    {
                        "resource": {
                            "azurerm_resource_group": {
                                "nested": { "name": "deep-name" }
                            }
                        }
                    }
                ]
            }
        });
        let (_dir, path) = write_config(&config);

        let summary = randomize_unique_resources_with(
            &path,
            &["azurerm_resource_group"],
            10,
            &mut StdRng::seed_from_u64(5),
        )
        .expect("mutation should succeed");

        assert_eq!(summary.renamed.len(), 1);
        assert_eq!(summary.renamed[0].logical_id, "nested");
    }

    #[test]
    fn instances_without_a_string_name_are_skipped() {
        let config = json!({
            "resource": {
                "azurerm_resource_group": {
                    "no_name": { "location": "eastus" },
                    "numeric_name": { "name": 7 }
                }
            }
        });
        let (_dir, path) = write_config(&config);

        let summary = randomize_unique_resources_with(
            &path,
            &["azurerm_resource_group"],
            10,
            &mut StdRng::seed_from_u64(9),
        )
        .expect("mutation should succeed");

        assert!(summary.is_noop());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("cdk.tf.json");
        fs::write(&path, "{ not json").expect("fixture write should succeed");

        let error = randomize_unique_resources_with(
            &path,
            DEFAULT_TARGET_TYPES,
            10,
            &mut StdRng::seed_from_u64(0),
        )
        .expect_err("invalid JSON should fail");

        assert!(matches!(error, HarnessError::Parse { .. }));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join("cdk.tf.json");
        fs::write(&path, "[1, 2, 3]").expect("fixture write should succeed");

        let error = randomize_unique_resources_with(
            &path,
            DEFAULT_TARGET_TYPES,
            10,
            &mut StdRng::seed_from_u64(0),
        )
        .expect_err("array root should fail");

        assert!(matches!(error, HarnessError::NotAnObject { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let error = randomize_unique_resources_with(
            std::path::Path::new("/nonexistent/cdk.tf.json"),
            DEFAULT_TARGET_TYPES,
            10,
            &mut StdRng::seed_from_u64(0),
        )
        .expect_err("missing file should fail");

        assert!(matches!(error, HarnessError::Io { .. }));
    }
}
