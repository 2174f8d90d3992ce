use std::{collections::HashMap, io, path::PathBuf};

use chrono::format::{Item, StrftimeItems};
use log::debug;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};

use crate::export::ExportSettings;
use crate::preview::Branding;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Каталог, куда выгружаются сертификаты.
    pub output_dir: PathBuf,

    /// Формат даты для интерактивной формы.
    pub date_format: String,

    /// Шаблон, который предлагается в интерактивной форме.
    pub default_template: String,

    /// Именованные шаблоны.
    pub templates: HashMap<String, String>,

    pub branding: Branding,

    pub export: ExportSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            date_format: "%Y-%m-%d".to_owned(),
            default_template: "{{recipientName}} has successfully completed the program, \
                demonstrating exceptional dedication and a commendable work ethic throughout."
                .to_owned(),
            templates: HashMap::new(),
            branding: Branding::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Config {
    /// Возвращает именованный шаблон.
    pub fn template(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }
}

/// Загружает конфигурацию.
/// Если файла нет, используются значения по умолчанию.
pub fn load(path: PathBuf) -> LoadResult {
    let mut cfg: Config = if path.exists() {
        confy::load_path(path)?
    } else {
        debug!("Файл {:?} не найден, используем конфиг по умолчанию", path);
        Config::default()
    };

    normalize(&mut cfg)?;

    Ok(cfg)
}

pub fn normalize(cfg: &mut Config) -> Result<(), LoadError> {
    // Чтобы правильно обработать относительные пути.
    cfg.output_dir = cfg.output_dir.try_resolve()?.into_owned();

    // Иначе форматирование даты в интерактивной форме запаникует.
    if StrftimeItems::new(&cfg.date_format).any(|item| matches!(item, Item::Error)) {
        return Err(LoadError::DateFormat(cfg.date_format.clone()));
    }

    Ok(())
}

pub type LoadResult = std::result::Result<Config, LoadError>;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("read config file")]
    ReadFile(#[from] confy::ConfyError),

    #[error("resolve path")]
    ResolvePath(#[from] io::Error),

    #[error("invalid date format \"{0}\"")]
    DateFormat(String),
}
