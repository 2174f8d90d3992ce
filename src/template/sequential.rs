use log::debug;

use super::Values;

/// Для каждого ключа по очереди заменяет все вхождения `{{ключ}}`.
/// Замена буквальная, значение не интерпретируется.
pub fn resolve(template: &str, values: &Values) -> String {
    values.iter().fold(template.to_owned(), |acc, (key, value)| {
        debug!("Подставляем значение {}", key);
        acc.replace(&pattern(key), value)
    })
}

fn pattern(key: &str) -> String {
    format!("{{{{{}}}}}", key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_for_key() {
        assert_eq!(pattern("recipientName"), "{{recipientName}}");
        assert_eq!(pattern(""), "{{}}");
    }

    #[test]
    fn overlapping_braces() {
        let mut values = Values::new();
        values.insert("x".to_owned(), "1".to_owned());

        assert_eq!(resolve("{{{x}}}", &values), "{1}");
        assert_eq!(resolve("{{x}}}}", &values), "1}}");
    }
}
