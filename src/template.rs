mod compiled;
mod sequential;

use indexmap::IndexMap;
use log::warn;

pub use compiled::Template;

/// Значения для подстановки: имя плейсхолдера -> значение.
/// Порядок вставки сохраняется и определяет порядок замен.
pub type Values = IndexMap<String, String>;

/// Способ подстановки значений в шаблон.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
pub enum Strategy {
    /// Для каждого ключа по очереди заменяются все вхождения `{{ключ}}`.
    /// Подставленное значение может быть заменено следующим ключом.
    #[default]
    #[display(fmt = "sequential")]
    Sequential,

    /// Шаблон разбирается один раз, каждый плейсхолдер ищется в значениях
    /// ровно один раз. Подставленные значения повторно не просматриваются.
    #[display(fmt = "single-pass")]
    SinglePass,
}

/// Подставляет значения в шаблон последовательной заменой.
pub fn resolve(template: &str, values: &Values) -> String {
    sequential::resolve(template, values)
}

/// Подставляет значения в шаблон выбранным способом.
pub fn resolve_with(strategy: Strategy, template: &str, values: &Values) -> String {
    for name in unresolved(template, values) {
        warn!("Для плейсхолдера {{{{{}}}}} нет значения, оставляем как есть", name);
    }

    match strategy {
        Strategy::Sequential => resolve(template, values),
        Strategy::SinglePass => Template::new(template).render(values),
    }
}

/// Возвращает имена всех плейсхолдеров шаблона в порядке появления.
pub fn placeholders(template: &str) -> Vec<&str> {
    Template::new(template).placeholders().collect()
}

/// Возвращает имена плейсхолдеров, для которых нет значения.
/// Каждое имя встречается в результате один раз.
pub fn unresolved<'a>(template: &'a str, values: &Values) -> Vec<&'a str> {
    let mut names: Vec<&str> = Vec::new();

    for name in placeholders(template) {
        if !values.contains_key(name) && !names.contains(&name) {
            names.push(name);
        }
    }

    names
}
