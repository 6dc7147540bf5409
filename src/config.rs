use crate::error::{MirrorError, Result};
use crate::types::config::MirrorConfig;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

pub const DATA_CONFIG_FILE: &str = "lovemirror.toml";
pub const LOCAL_OVERRIDE_FILE: &str = ".lovemirror/local.toml";
pub const USER_CONFIG_FILE: &str = ".config/lovemirror/config.toml";

/// The TOML files that make up one data directory's configuration, lowest
/// precedence first. Nothing is loaded unless the data-dir file exists; the
/// user file and local override only adjust it.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub user: Option<PathBuf>,
    pub data: PathBuf,
    pub local: PathBuf,
}

impl ConfigSources {
    pub fn for_data_dir(data_dir: &Path) -> Self {
        let user = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(USER_CONFIG_FILE));
        Self::with_user_file(data_dir, user)
    }

    pub fn with_user_file(data_dir: &Path, user: Option<PathBuf>) -> Self {
        Self {
            user,
            data: data_dir.join(DATA_CONFIG_FILE),
            local: data_dir.join(LOCAL_OVERRIDE_FILE),
        }
    }

    fn layers(&self) -> impl Iterator<Item = &Path> {
        self.user
            .as_deref()
            .into_iter()
            .chain([self.data.as_path(), self.local.as_path()])
    }

    /// Merges every present layer and validates the result. `None` when the
    /// data directory has no `lovemirror.toml`.
    pub fn load(&self) -> Result<Option<MirrorConfig>> {
        if !self.data.exists() {
            return Ok(None);
        }

        let mut merged = Table::new();
        for path in self.layers().filter(|path| path.exists()) {
            overlay(&mut merged, parse_table(path)?);
            tracing::debug!(path = %path.display(), "applied config layer");
        }

        let cfg = MirrorConfig::deserialize_table(merged)?;
        cfg.validate()?;
        Ok(Some(cfg))
    }
}

pub fn load_config(data_dir: &Path) -> Result<Option<MirrorConfig>> {
    ConfigSources::for_data_dir(data_dir).load()
}

fn parse_table(path: &Path) -> Result<Table> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<Table>()
        .map_err(|e| MirrorError::ConfigParse(format!("{}: {}", path.display(), e)))
}

/// Later layers win key by key; nested tables are merged rather than replaced.
fn overlay(base: &mut Table, layer: Table) {
    for (key, value) in layer {
        match value {
            Value::Table(nested) => match base.get_mut(&key) {
                Some(Value::Table(existing)) => overlay(existing, nested),
                _ => {
                    base.insert(key, Value::Table(nested));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::assessment::{AssessmentType, Category};
    use std::fs;
    use tempfile::TempDir;

    fn sources(data: &TempDir, user: Option<PathBuf>) -> ConfigSources {
        ConfigSources::with_user_file(data.path(), user)
    }

    #[test]
    fn nothing_loads_without_a_data_dir_file() {
        let data = TempDir::new().expect("temp dir should be created");
        let home = TempDir::new().expect("temp dir should be created");
        let user = home.path().join("config.toml");
        fs::write(&user, "[store]\nfile = \"elsewhere.json\"\n").expect("write");

        let cfg = sources(&data, Some(user)).load().expect("load should not fail");
        assert!(cfg.is_none());
    }

    #[test]
    fn local_override_beats_data_file_which_beats_user_file() {
        let data = TempDir::new().expect("data temp dir should be created");
        let home = TempDir::new().expect("home temp dir should be created");
        let user = home.path().join("config.toml");

        fs::write(
            &user,
            r#"
[bridal_price]
currency_symbol = "£"
base_value = 5000

[compatibility]
recommendation_threshold = 50
"#,
        )
        .expect("user config should write");
        fs::write(
            data.path().join(DATA_CONFIG_FILE),
            r#"
[store]
file = "couple.json"

[bridal_price]
base_value = 12000

[weights.high-value-man]
"Mental Traits" = 2.0
"#,
        )
        .expect("data config should write");
        fs::create_dir_all(data.path().join(".lovemirror")).expect("local dir should create");
        fs::write(
            data.path().join(LOCAL_OVERRIDE_FILE),
            "[compatibility]\nrecommendation_threshold = 80\n",
        )
        .expect("local override should write");

        let cfg = sources(&data, Some(user))
            .load()
            .expect("load should succeed")
            .expect("merged config should exist");

        assert_eq!(cfg.store_file(), "couple.json");
        assert_eq!(cfg.recommendation_threshold(), 80.0);
        let bridal = cfg.bridal_price.as_ref().expect("bridal section should merge");
        assert_eq!(bridal.base_value, Some(12_000.0));
        assert_eq!(bridal.currency_symbol.as_deref(), Some("£"));
        assert_eq!(
            cfg.scoring_tables()
                .for_type(AssessmentType::HighValueMan)
                .weights
                .get(Category::Mental),
            2.0
        );
    }

    #[test]
    fn scalar_layer_replaces_a_table() {
        let mut base: Table = "[store]\nfile = \"a.json\"\n".parse().expect("toml");
        overlay(&mut base, "store = 3\n".parse().expect("toml"));
        assert_eq!(base.get("store"), Some(&Value::Integer(3)));
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let data = TempDir::new().expect("temp dir should be created");
        fs::write(
            data.path().join(DATA_CONFIG_FILE),
            "[compatibility]\nrecommendation_threshold = 150\n",
        )
        .expect("data config should write");

        let err = sources(&data, None).load().expect_err("load should fail");
        assert!(matches!(err, MirrorError::ConfigParse(_)));
    }

    #[test]
    fn syntax_errors_name_the_file() {
        let data = TempDir::new().expect("temp dir should be created");
        fs::write(data.path().join(DATA_CONFIG_FILE), "[store\n").expect("write");

        let err = sources(&data, None).load().expect_err("load should fail");
        assert!(err.to_string().contains(DATA_CONFIG_FILE));
    }
}
