use serde::Serialize;

use crate::newtype;
use crate::template::{self, Strategy, Values};

/// Все поля формы сертификата.
/// Порядок вариантов совпадает с порядком полей в форме.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    std::hash::Hash,
    derive_more::Display,
    enum_iterator::Sequence,
)]
pub enum FieldName {
    #[display(fmt = "recipientName")]
    RecipientName,
    #[display(fmt = "certificateId")]
    CertificateId,
    #[display(fmt = "date")]
    Date,
    #[display(fmt = "template")]
    Template,
}

impl FieldName {
    /// Название поля для пользователя.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RecipientName => "Recipient name",
            Self::CertificateId => "Certificate ID",
            Self::Date => "Date",
            Self::Template => "Template",
        }
    }

    /// Поле может быть подставлено в шаблон как плейсхолдер.
    pub fn is_placeholder(&self) -> bool {
        !matches!(self, Self::Template)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{} is required", .0.label())]
    Required(FieldName),
}

/// Проверяет что значение обязательного поля заполнено.
pub fn required(field: FieldName, value: &str) -> Result<(), FieldError> {
    if value.is_empty() {
        return Err(FieldError::Required(field));
    }

    Ok(())
}

newtype!(RecipientName, FieldName::RecipientName);

newtype!(CertificateId, FieldName::CertificateId);

newtype!(CertificateDate, FieldName::Date);

newtype!(TemplateText, FieldName::Template);

/// Заявка на сертификат.
/// Собирается заново при каждой отправке формы и дальше не меняется.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    /// Имя получателя.
    pub recipient_name: RecipientName,

    /// Идентификатор сертификата. Формат не проверяется.
    pub certificate_id: CertificateId,

    /// Дата в том виде, в котором её ввёл пользователь.
    pub date: CertificateDate,

    /// Текст шаблона с плейсхолдерами.
    pub template: TemplateText,
}

impl CertificateRequest {
    /// Значения для подстановки в шаблон.
    /// Ключи идут в порядке полей формы, от этого зависит результат
    /// последовательной подстановки.
    pub fn values(&self) -> Values {
        let mut values = Values::with_capacity(3);
        values.insert(
            FieldName::RecipientName.to_string(),
            self.recipient_name.to_string(),
        );
        values.insert(
            FieldName::CertificateId.to_string(),
            self.certificate_id.to_string(),
        );
        values.insert(FieldName::Date.to_string(), self.date.to_string());
        values
    }

    /// Подставляет значения полей в шаблон.
    pub fn resolve(self, strategy: Strategy) -> ResolvedCertificate {
        let values = self.values();
        let template = template::resolve_with(strategy, self.template.as_str(), &values);

        ResolvedCertificate {
            recipient_name: self.recipient_name,
            certificate_id: self.certificate_id,
            date: self.date,
            template,
        }
    }
}

/// Сертификат с уже подставленным шаблоном.
/// Именно его получает превью.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCertificate {
    pub recipient_name: RecipientName,
    pub certificate_id: CertificateId,
    pub date: CertificateDate,

    /// Итоговый текст сертификата.
    pub template: String,
}
