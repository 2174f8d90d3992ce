use handlebars::Handlebars;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::export::ExportSettings;
use crate::model::ResolvedCertificate;

const LAYOUT_NAME: &str = "certificate";
const LAYOUT: &str = include_str!("preview/certificate.hbs");

/// Оформление сертификата.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Branding {
    /// Название организации в шапке.
    pub organization: String,

    pub headline: String,
    pub subheadline: String,

    /// Кто подписывает сертификат.
    pub signatory_name: String,
    pub signatory_title: String,

    /// Подпись рядом с печатью.
    pub certified_label: String,

    pub accent_color: String,
    pub secondary_color: String,

    /// Пути до изображений. Если путь не задан, изображение не выводится.
    pub logo_path: Option<String>,
    pub signature_path: Option<String>,
    pub stamp_path: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            organization: "CERTGEN".to_owned(),
            headline: "CERTIFICATE".to_owned(),
            subheadline: "OF INTERNSHIP".to_owned(),
            signatory_name: "Program Director".to_owned(),
            signatory_title: "Founder".to_owned(),
            certified_label: "CERTIFIED".to_owned(),
            accent_color: "#FD642E".to_owned(),
            secondary_color: "#FC3946".to_owned(),
            logo_path: Some("assets/logo.png".to_owned()),
            signature_path: Some("assets/sign.png".to_owned()),
            stamp_path: Some("assets/certificate1.png".to_owned()),
        }
    }
}

/// Отрисовывает превью сертификата в HTML документ.
pub struct Renderer {
    handlebars: Handlebars<'static>,
    branding: Branding,
}

#[derive(Serialize)]
struct Context<'a> {
    certificate: &'a ResolvedCertificate,
    branding: &'a Branding,
    page_css: String,
}

impl Renderer {
    pub fn new(branding: Branding) -> RenderResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string(LAYOUT_NAME, LAYOUT)?;

        Ok(Self {
            handlebars,
            branding,
        })
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    /// Отрисовывает сертификат.
    /// Все значения полей экранируются.
    pub fn render(
        &self,
        certificate: &ResolvedCertificate,
        settings: &ExportSettings,
    ) -> RenderResult<String> {
        debug!("Рисуем превью сертификата {}", certificate.certificate_id);

        let context = Context {
            certificate,
            branding: &self.branding,
            page_css: settings.page_css(),
        };

        Ok(self.handlebars.render(LAYOUT_NAME, &context)?)
    }
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("compile certificate layout")]
    Layout(#[from] handlebars::TemplateError),

    #[error("render certificate")]
    Render(#[from] handlebars::RenderError),
}
