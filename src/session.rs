use crate::form::{self, Form, ValidationErrors};
use crate::model::ResolvedCertificate;
use crate::template::Strategy;

/// Состояние сессии заполнения формы.
/// Хранит последний успешно отправленный сертификат, если он есть.
#[derive(Debug, Default)]
pub struct Session {
    strategy: Strategy,

    /// Текущий сертификат для превью.
    current: Option<ResolvedCertificate>,
}

impl Session {
    /// Создаёт пустую сессию.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            current: None,
        }
    }

    /// Отправляет форму.
    /// При успехе новый сертификат заменяет предыдущий. При ошибке проверки
    /// предыдущий сертификат остаётся на месте.
    pub fn submit(&mut self, form: &Form) -> Result<&ResolvedCertificate, ValidationErrors> {
        let resolved = form::submit(form, self.strategy)?;

        Ok(&*self.current.insert(resolved))
    }

    /// Возвращает текущий сертификат.
    pub fn current(&self) -> Option<&ResolvedCertificate> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str) -> Form {
        Form {
            recipient_name: name.to_owned(),
            certificate_id: "C-001".to_owned(),
            date: "2024-01-01".to_owned(),
            template: "Awarded to {{recipientName}}".to_owned(),
        }
    }

    #[test]
    fn starts_empty() {
        let session = Session::default();
        assert!(session.current().is_none());
    }

    #[test]
    fn submission_replaces_previous() {
        let mut session = Session::new(Strategy::Sequential);

        session.submit(&form("Ann")).unwrap();
        let current = session.submit(&form("Bob")).unwrap();
        assert_eq!(current.template, "Awarded to Bob");

        assert_eq!(
            session.current().map(|c| c.template.as_str()),
            Some("Awarded to Bob")
        );
    }

    #[test]
    fn failed_submission_keeps_previous() {
        let mut session = Session::new(Strategy::Sequential);
        session.submit(&form("Ann")).unwrap();

        assert!(session.submit(&form("")).is_err());
        assert_eq!(
            session.current().map(|c| c.recipient_name.as_str()),
            Some("Ann")
        );
    }
}
