mod pdf;

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::model::ResolvedCertificate;
use crate::preview::{RenderError, Renderer};

/// Настройки выгрузки сертификата.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Имя файла без расширения в каталоге выгрузки.
    /// Расширение определяется форматом документа.
    pub filename: String,

    /// Формат документа.
    pub output: OutputFormat,

    /// Формат страницы при печати.
    pub format: PageFormat,

    /// Ориентация страницы.
    pub orientation: Orientation,

    /// Поля страницы в дюймах: вертикальные и горизонтальные.
    pub margin: [f32; 2],
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            filename: "certificate".to_owned(),
            output: OutputFormat::Html,
            format: PageFormat::Letter,
            orientation: Orientation::Portrait,
            margin: [1.0, 0.0],
        }
    }
}

impl ExportSettings {
    /// CSS правило `@page` для печати документа.
    pub fn page_css(&self) -> String {
        format!(
            "@page {{ size: {} {}; margin: {}in {}in; }}",
            self.format, self.orientation, self.margin[0], self.margin[1]
        )
    }

    /// Размер страницы в пунктах с учётом ориентации.
    pub fn page_size(&self) -> (f32, f32) {
        let (width, height) = self.format.size();
        match self.orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }

    /// Путь до файла документа в каталоге выгрузки.
    /// Имя файла должно состоять ровно из одной обычной компоненты пути.
    pub fn target(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let mut components = Path::new(&self.filename).components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(ExportError::InvalidFilename(self.filename.clone())),
        }

        Ok(dir.join(format!("{}.{}", self.filename, self.output)))
    }
}

#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML документ для печати из браузера.
    #[default]
    #[display(fmt = "html")]
    Html,

    /// Готовый PDF документ.
    #[display(fmt = "pdf")]
    Pdf,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[display(fmt = "letter")]
    Letter,
    #[display(fmt = "legal")]
    Legal,
    #[display(fmt = "A4")]
    A4,
}

impl PageFormat {
    /// Размер книжной страницы в пунктах.
    pub fn size(&self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::A4 => (595.0, 842.0),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[display(fmt = "portrait")]
    Portrait,
    #[display(fmt = "landscape")]
    Landscape,
}

/// Отрисовывает сертификат в выбранном формате и сохраняет в указанный каталог.
/// Возвращает путь до записанного файла.
pub fn export(
    certificate: &ResolvedCertificate,
    renderer: &Renderer,
    settings: &ExportSettings,
    dir: &Path,
) -> ExportResult {
    let path = settings.target(dir)?;

    let document = match settings.output {
        OutputFormat::Html => renderer.render(certificate, settings)?.into_bytes(),
        OutputFormat::Pdf => pdf::render(certificate, renderer.branding(), settings)?,
    };

    fs::create_dir_all(dir)?;

    fs::write(&path, document)?;

    info!("Сертификат сохранён в {:?}", path);

    Ok(path)
}

pub type ExportResult = std::result::Result<PathBuf, ExportError>;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("invalid export filename \"{0}\"")]
    InvalidFilename(String),

    #[error("render html document")]
    Html(#[from] RenderError),

    #[error("render pdf document")]
    Pdf(#[from] lopdf::Error),

    #[error("write certificate file")]
    WriteFile(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{self, Form};
    use crate::preview::Branding;
    use crate::template::Strategy;

    fn certificate() -> ResolvedCertificate {
        let form = Form {
            recipient_name: "Jane Doe".to_owned(),
            certificate_id: "C-001".to_owned(),
            date: "2024-01-01".to_owned(),
            template: "{{recipientName}} completed the course.".to_owned(),
        };
        form::submit(&form, Strategy::Sequential).unwrap()
    }

    fn renderer() -> Renderer {
        Renderer::new(Branding::default()).unwrap()
    }

    #[test]
    fn default_page_css() {
        assert_eq!(
            ExportSettings::default().page_css(),
            "@page { size: letter portrait; margin: 1in 0in; }"
        );
    }

    #[test]
    fn custom_page_css() {
        let settings = ExportSettings {
            format: PageFormat::A4,
            orientation: Orientation::Landscape,
            margin: [0.5, 0.25],
            ..ExportSettings::default()
        };
        assert_eq!(
            settings.page_css(),
            "@page { size: A4 landscape; margin: 0.5in 0.25in; }"
        );
        assert_eq!(settings.page_size(), (842.0, 595.0));
    }

    #[test]
    fn export_writes_html() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");

        let path = export(&certificate(), &renderer(), &ExportSettings::default(), &out).unwrap();

        assert_eq!(path, out.join("certificate.html"));
        let document = fs::read_to_string(path).unwrap();
        assert!(document.contains("Jane Doe completed the course."));
    }

    #[test]
    fn export_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings {
            output: OutputFormat::Pdf,
            ..ExportSettings::default()
        };

        let path = export(&certificate(), &renderer(), &settings, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("certificate.pdf"));
        assert!(fs::read(path).unwrap().starts_with(b"%PDF-"));
    }

    #[test]
    fn export_rejects_bad_filenames() {
        let dir = tempfile::tempdir().unwrap();

        for filename in ["", "../certificate", "/tmp/certificate", "nested/certificate", "."] {
            let settings = ExportSettings {
                filename: filename.to_owned(),
                ..ExportSettings::default()
            };

            assert!(
                matches!(
                    export(&certificate(), &renderer(), &settings, dir.path()),
                    Err(ExportError::InvalidFilename(_))
                ),
                "{filename}"
            );
        }

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
