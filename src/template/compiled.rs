use log::debug;

use super::Values;

/// Разобранный шаблон.
/// Хранит последовательность кусков исходной строки: обычный текст и
/// плейсхолдеры.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

/// Кусок шаблона.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Текст, который выводится как есть.
    /// Сюда же попадают скобки, не образующие плейсхолдер.
    Text(&'a str),

    /// Плейсхолдер `{{name}}`.
    Placeholder(&'a str),
}

impl<'a> Template<'a> {
    /// Разбирает шаблон.
    pub fn new(input: &'a str) -> Self {
        // Грамматика принимает любую строку, ошибка тут означает баг в ней.
        let segments = template::segments(input).unwrap_or_else(|e| {
            debug!("Не удалось разобрать шаблон: {}", e);
            vec![Segment::Text(input)]
        });

        Self { segments }
    }

    /// Имена плейсхолдеров в порядке появления.
    pub fn placeholders(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(*name),
            Segment::Text(_) => None,
        })
    }

    /// Собирает итоговую строку за один проход.
    /// Плейсхолдеры без значения остаются в исходном виде.
    pub fn render(&self, values: &Values) -> String {
        let mut result = String::new();

        for segment in self.segments.iter() {
            match segment {
                Segment::Text(text) => result.push_str(text),
                Segment::Placeholder(name) => match values.get(*name) {
                    Some(value) => {
                        debug!("Подставляем значение {}", name);
                        result.push_str(value);
                    }
                    None => {
                        result.push_str("{{");
                        result.push_str(name);
                        result.push_str("}}");
                    }
                },
            }
        }

        result
    }
}

peg::parser! {
    grammar template() for str {
        pub rule segments() -> Vec<Segment<'input>>
            = s:(placeholder() / text())* { s }

        rule placeholder() -> Segment<'input>
            = "{{" n:$(name_char()*) "}}" {
                Segment::Placeholder(n)
            }

        rule text() -> Segment<'input>
            = t:$((!placeholder() [_])+) {
                Segment::Text(t)
            }

        rule name_char() = [^ '{' | '}']
    }
}
