use chrono::{Local, NaiveDate};
use enum_iterator::all;
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, DateSelect, Text};

use crate::{
    config::Config,
    form::Form,
    model::{self, FieldName},
};

/// Запрашивает у пользователя все поля формы.
/// Значения из `defaults` предлагаются как значения по-умолчанию.
pub fn ask(defaults: &Form, cfg: &Config) -> anyhow::Result<Form> {
    let mut form = Form::default();

    for name in all::<FieldName>() {
        let value = match name {
            FieldName::Date => ask_date(defaults.get(name), &cfg.date_format)?,
            FieldName::Template => {
                let default = match defaults.get(name) {
                    "" => cfg.default_template.as_str(),
                    d => d,
                };
                prompt(name, default, Some(&placeholders_help()))?
            }
            _ => prompt(name, defaults.get(name), None)?,
        };

        form.set(name, value);
    }

    Ok(form)
}

/// Спрашивает, нужно ли выгрузить сертификат.
pub fn confirm_download() -> anyhow::Result<bool> {
    let answer = Confirm::new("Download the certificate?")
        .with_default(true)
        .with_help_message("Answer \"no\" to edit the form again")
        .prompt()?;

    Ok(answer)
}

fn prompt(name: FieldName, default: &str, help: Option<&str>) -> anyhow::Result<String> {
    let mut prompt = Text::new(name.label());

    if !default.is_empty() {
        prompt = prompt.with_default(default);
    }

    if let Some(help) = help {
        prompt = prompt.with_help_message(help);
    }

    // Все поля формы обязательны для заполнения.
    prompt = prompt.with_validator(
        move |s: &str| -> Result<Validation, CustomUserError> {
            match model::required(name, s) {
                Ok(()) => Ok(Validation::Valid),
                Err(e) => Ok(Validation::Invalid(e.to_string().into())),
            }
        },
    );

    let val = prompt.prompt()?;

    Ok(val)
}

fn ask_date(default: &str, format: &str) -> anyhow::Result<String> {
    let default = NaiveDate::parse_from_str(default, format)
        .unwrap_or_else(|_| Local::now().date_naive());

    let date = DateSelect::new(FieldName::Date.label())
        .with_default(default)
        .prompt()?;

    Ok(date.format(format).to_string())
}

fn placeholders_help() -> String {
    let names: Vec<String> = all::<FieldName>()
        .filter(FieldName::is_placeholder)
        .map(|name| format!("{{{{{}}}}}", name))
        .collect();

    format!("Available placeholders: {}", names.join(", "))
}
