use std::{fs, io, path::Path};

use log::debug;
use serde::Deserialize;

use crate::model::{
    CertificateDate, CertificateId, CertificateRequest, FieldError, FieldName, RecipientName,
    ResolvedCertificate, TemplateText,
};
use crate::template::Strategy;

/// "Сырая" форма сертификата.
/// Значения ещё не проверены, любое поле может быть пустым.
#[derive(Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Form {
    pub recipient_name: String,
    pub certificate_id: String,
    pub date: String,
    pub template: String,
}

impl Form {
    /// Проверяет все поля формы.
    /// Возвращает ошибки сразу по всем незаполненным полям.
    pub fn validate(&self) -> Result<CertificateRequest, ValidationErrors> {
        let mut errors = Vec::new();

        let recipient_name = collect(RecipientName::new(&self.recipient_name), &mut errors);
        let certificate_id = collect(CertificateId::new(&self.certificate_id), &mut errors);
        let date = collect(CertificateDate::new(&self.date), &mut errors);
        let template = collect(TemplateText::new(&self.template), &mut errors);

        match (recipient_name, certificate_id, date, template) {
            (Some(recipient_name), Some(certificate_id), Some(date), Some(template)) => {
                Ok(CertificateRequest {
                    recipient_name,
                    certificate_id,
                    date,
                    template,
                })
            }
            _ => Err(ValidationErrors(errors)),
        }
    }

    /// Возвращает значение поля.
    pub fn get(&self, name: FieldName) -> &str {
        match name {
            FieldName::RecipientName => &self.recipient_name,
            FieldName::CertificateId => &self.certificate_id,
            FieldName::Date => &self.date,
            FieldName::Template => &self.template,
        }
    }

    /// Устанавливает значение поля.
    pub fn set(&mut self, name: FieldName, value: String) {
        match name {
            FieldName::RecipientName => self.recipient_name = value,
            FieldName::CertificateId => self.certificate_id = value,
            FieldName::Date => self.date = value,
            FieldName::Template => self.template = value,
        }
    }

    /// Накладывает непустые значения другой формы поверх текущей.
    pub fn merge(mut self, other: Form) -> Self {
        if !other.recipient_name.is_empty() {
            self.recipient_name = other.recipient_name;
        }
        if !other.certificate_id.is_empty() {
            self.certificate_id = other.certificate_id;
        }
        if !other.date.is_empty() {
            self.date = other.date;
        }
        if !other.template.is_empty() {
            self.template = other.template;
        }
        self
    }
}

fn collect<T>(res: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Отправляет форму: проверяет поля и подставляет их значения в шаблон.
/// Шаблон не обрабатывается, если хотя бы одно поле не заполнено.
pub fn submit(form: &Form, strategy: Strategy) -> Result<ResolvedCertificate, ValidationErrors> {
    let request = form.validate()?;

    debug!("Подставляем значения в шаблон, стратегия {}", strategy);

    Ok(request.resolve(strategy))
}

/// Ошибки проверки формы, по одной на каждое поле.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

/// Загружает форму из JSON файла.
pub fn load(path: &Path) -> LoadResult {
    let content = fs::read_to_string(path)?;

    let form: Form = serde_json::from_str(&content)?;

    Ok(form)
}

pub type LoadResult = std::result::Result<Form, LoadError>;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("read form file")]
    ReadFile(#[from] io::Error),

    #[error("deserialize")]
    Deserialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Form {
        Form {
            recipient_name: "Jane Doe".to_owned(),
            certificate_id: "C-001".to_owned(),
            date: "2024-01-01".to_owned(),
            template: "{{recipientName}} completed the course on {{date}}, ID {{certificateId}}."
                .to_owned(),
        }
    }

    #[test]
    fn submit_filled_form() {
        let resolved = submit(&filled(), Strategy::Sequential).unwrap();
        assert_eq!(
            resolved.template,
            "Jane Doe completed the course on 2024-01-01, ID C-001."
        );
        assert_eq!(resolved.recipient_name.as_str(), "Jane Doe");
    }

    #[test]
    fn all_missing_fields_are_reported() {
        let form = Form {
            certificate_id: "C-001".to_owned(),
            ..Form::default()
        };

        let err = submit(&form, Strategy::Sequential).unwrap_err();

        assert_eq!(
            err.errors(),
            &[
                FieldError::Required(FieldName::RecipientName),
                FieldError::Required(FieldName::Date),
                FieldError::Required(FieldName::Template),
            ]
        );
        assert_eq!(
            err.to_string(),
            "Recipient name is required\nDate is required\nTemplate is required"
        );
    }

    #[test]
    fn placeholder_shaped_name() {
        let form = Form {
            recipient_name: "{{date}}".to_owned(),
            template: "{{recipientName}}".to_owned(),
            ..filled()
        };

        assert_eq!(
            submit(&form, Strategy::Sequential).unwrap().template,
            "2024-01-01"
        );
        assert_eq!(
            submit(&form, Strategy::SinglePass).unwrap().template,
            "{{date}}"
        );
    }

    #[test]
    fn template_field_is_not_a_placeholder() {
        let form = Form {
            template: "{{template}} by {{recipientName}}".to_owned(),
            ..filled()
        };

        assert_eq!(
            submit(&form, Strategy::Sequential).unwrap().template,
            "{{template}} by Jane Doe"
        );
    }

    #[test]
    fn deserialize_partial_form() {
        let form: Form = serde_json::from_str(r#"{"recipientName":"Ann","date":"today"}"#).unwrap();
        assert_eq!(form.recipient_name, "Ann");
        assert_eq!(form.certificate_id, "");
        assert_eq!(form.date, "today");
    }

    #[test]
    fn set_and_get_every_field() {
        let mut form = Form::default();
        for name in enum_iterator::all::<FieldName>() {
            form.set(name, name.to_string());
        }

        assert_eq!(form.get(FieldName::RecipientName), "recipientName");
        assert_eq!(form.certificate_id, "certificateId");
        assert_eq!(form.get(FieldName::Date), "date");
        assert_eq!(form.template, "template");
    }

    #[test]
    fn merge_overrides_only_filled_fields() {
        let base = filled();
        let overrides = Form {
            date: "2025-02-02".to_owned(),
            ..Form::default()
        };

        let merged = base.clone().merge(overrides);

        assert_eq!(merged.date, "2025-02-02");
        assert_eq!(merged.recipient_name, base.recipient_name);
        assert_eq!(merged.template, base.template);
    }
}
