//! Variable substitution
//!
//! Replaces `{{key}}` for every key present in the context, in context
//! order. Field helpers (`{{upper key}}`, `{{lower key}}`, `{{currency key}}`,
//! `{{number key}}`) are resolved first. Tokens naming keys that are absent
//! from the context are left untouched for the cleanup pass.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::convert::Infallible;
use tracing::{trace, warn};

use super::context::{Context, Value};
use super::options::{RenderOptions, SILENT_EMPTY_FIELD};
use crate::date::{DateFormatError, DateFormatter};
use crate::error::{MinutaError, Result};

/// `{{helper key}}`
static HELPER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{(upper|lower|currency|number)\s+([A-Za-z0-9_]+)\}\}")
        .expect("Valid regex pattern")
});

/// Dots used only as thousands separators: `1.500`, `12.345.678`
static THOUSANDS_ONLY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(\.\d{3})+$").expect("Valid regex pattern"));

/// Name fragments that mark a field as holding a date
const DATE_FIELD_MARKERS: [&str; 2] = ["data", "date"];

/// Case-insensitive check for `data`/`date` in a field name
pub fn is_date_field(key: &str) -> bool {
    let lowered = key.to_lowercase();
    DATE_FIELD_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Run the substitution stage over `template`.
///
/// A value the date formatter rejects is logged and substituted raw.
pub fn substitute_variables(
    template: &str,
    context: &Context,
    options: &RenderOptions,
    formatter: &dyn DateFormatter,
) -> String {
    let substituted = substitute_with(template, context, options, formatter, |key, raw, source| {
        warn!("Could not localize date field '{}': {}", key, source);
        Ok::<_, Infallible>(raw.to_string())
    });

    match substituted {
        Ok(result) => result,
        Err(never) => match never {},
    }
}

/// Like [`substitute_variables`], but the first date formatter failure aborts
/// the stage with [`MinutaError::DateFormat`].
pub fn try_substitute_variables(
    template: &str,
    context: &Context,
    options: &RenderOptions,
    formatter: &dyn DateFormatter,
) -> Result<String> {
    substitute_with(template, context, options, formatter, |key, _raw, source| {
        Err(MinutaError::DateFormat {
            field: key.to_string(),
            source,
        })
    })
}

fn substitute_with<E>(
    template: &str,
    context: &Context,
    options: &RenderOptions,
    formatter: &dyn DateFormatter,
    on_date_error: impl Fn(&str, &str, DateFormatError) -> std::result::Result<String, E>,
) -> std::result::Result<String, E> {
    let mut result = apply_field_helpers(template, context, options);

    for (key, value) in context.iter() {
        let placeholder = format!("{{{{{}}}}}", key);
        if !result.contains(&placeholder) {
            continue;
        }

        let formatted = match field_text(key, value, options, formatter) {
            Ok(text) => text,
            Err((raw, source)) => on_date_error(key, raw, source)?,
        };
        trace!("{} -> {:?}", placeholder, formatted);
        result = result.replace(&placeholder, &formatted);
    }

    Ok(result)
}

/// Text substituted for a single field, or the raw value the date formatter
/// rejected together with its error.
fn field_text<'a>(
    key: &str,
    value: &'a Value,
    options: &RenderOptions,
    formatter: &dyn DateFormatter,
) -> std::result::Result<String, (&'a str, DateFormatError)> {
    if value.is_empty() {
        return Ok(missing_value(key, options));
    }

    if options.format_dates && is_date_field(key) {
        if let Some(raw) = value.as_text().filter(|text| !text.trim().is_empty()) {
            return formatter.format(raw).map_err(|source| (raw, source));
        }
    }

    Ok(value.display_text().into_owned())
}

fn missing_value(key: &str, options: &RenderOptions) -> String {
    if key == SILENT_EMPTY_FIELD {
        String::new()
    } else {
        options.missing_field_placeholder.clone()
    }
}

/// Resolve `{{upper k}}`, `{{lower k}}`, `{{currency k}}` and `{{number k}}`.
fn apply_field_helpers(template: &str, context: &Context, options: &RenderOptions) -> String {
    HELPER_REGEX
        .replace_all(template, |caps: &Captures| {
            let helper = &caps[1];
            let key = &caps[2];
            let Some(value) = context.get(key) else {
                return caps[0].to_string();
            };
            if value.is_empty() {
                return missing_value(key, options);
            }

            let text = value.display_text();
            match helper {
                "upper" => text.to_uppercase(),
                "lower" => text.to_lowercase(),
                "currency" => parse_decimal(&text)
                    .map(format_currency)
                    .unwrap_or_else(|| text.into_owned()),
                "number" => parse_decimal(&text)
                    .map(format_number)
                    .unwrap_or_else(|| text.into_owned()),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Parse a decimal written either as `1234.5` or in pt-BR form `1.234,50`.
/// Currency symbols and other decoration are ignored. Without a comma, dots
/// in groups of three (`1.500`) are thousands separators.
fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else if THOUSANDS_ONLY_REGEX.is_match(&cleaned) {
        cleaned.replace('.', "")
    } else {
        cleaned
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `R$ 1.234,56`
///
/// Goes through `f64`, so it is exact for everyday contract amounts but not
/// beyond about 2^53.
fn format_currency(value: f64) -> String {
    let (sign, integer, fraction) = split_decimal(value, 2);
    format!("{}R$ {},{}", sign, group_thousands(&integer), fraction)
}

/// `1.234,5` with at most three decimal places
fn format_number(value: f64) -> String {
    let (sign, integer, fraction) = split_decimal(value, 3);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}{}", sign, group_thousands(&integer))
    } else {
        format!("{}{},{}", sign, group_thousands(&integer), fraction)
    }
}

fn split_decimal(value: f64, decimals: usize) -> (&'static str, String, String) {
    let formatted = format!("{:.*}", decimals, value.abs());
    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let (integer, fraction) = formatted
        .split_once('.')
        .map(|(i, f)| (i.to_string(), f.to_string()))
        .unwrap_or((formatted.clone(), String::new()));
    (if negative { "-" } else { "" }, integer, fraction)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::BrazilianDateFormatter;

    fn substitute(template: &str, context: &Context) -> String {
        substitute_variables(template, context, &RenderOptions::default(), &BrazilianDateFormatter)
    }

    struct FailingFormatter;

    impl DateFormatter for FailingFormatter {
        fn format(&self, _raw: &str) -> std::result::Result<String, DateFormatError> {
            Err(DateFormatError::Other("calendar service offline".to_string()))
        }
    }

    #[test]
    fn test_is_date_field() {
        assert!(is_date_field("dataContrato"));
        assert!(is_date_field("DATA_INICIO"));
        assert!(is_date_field("updatedAt_date"));
        // substring match, not word match
        assert!(is_date_field("mandatario"));
        assert!(!is_date_field("valorContrato"));
        assert!(!is_date_field("prazo"));
    }

    #[test]
    fn test_plain_substitution() {
        let context = Context::new().with("nome", "Ana").with("cidade", "Recife");
        assert_eq!(substitute("{{nome}} de {{cidade}}, {{nome}}", &context), "Ana de Recife, Ana");
    }

    #[test]
    fn test_date_heuristic_is_scoped_to_field_name() {
        let context = Context::new()
            .with("dataContrato", "2024-01-05")
            .with("valorContrato", "2024-01-05");
        assert_eq!(
            substitute("{{dataContrato}}|{{valorContrato}}", &context),
            "05/01/2024|2024-01-05"
        );
    }

    #[test]
    fn test_date_formatting_can_be_disabled() {
        let context = Context::new().with("dataContrato", "2024-01-05");
        let options = RenderOptions::default().with_date_formatting(false);
        let result = substitute_variables(
            "{{dataContrato}}",
            &context,
            &options,
            &BrazilianDateFormatter,
        );
        assert_eq!(result, "2024-01-05");
    }

    #[test]
    fn test_missing_values_use_placeholder() {
        let context = Context::new()
            .with("endereco", Value::Null)
            .with("bairro", "")
            .with("fiadores", Vec::<String>::new());
        assert_eq!(
            substitute("{{endereco}}/{{bairro}}/{{fiadores}}", &context),
            "[CAMPO]/[CAMPO]/[CAMPO]"
        );
    }

    #[test]
    fn test_empty_observacao_renders_nothing() {
        let context = Context::new().with("observacao", Value::Null);
        assert_eq!(substitute("obs: {{observacao}}.", &context), "obs: .");
    }

    #[test]
    fn test_custom_placeholder() {
        let context = Context::new().with("endereco", "");
        let options = RenderOptions::default().with_missing_field_placeholder("____");
        let result = substitute_variables(
            "{{endereco}}",
            &context,
            &options,
            &BrazilianDateFormatter,
        );
        assert_eq!(result, "____");
    }

    #[test]
    fn test_whitespace_value_is_kept_raw() {
        let context = Context::new().with("dataEntrega", "  ");
        assert_eq!(substitute("[{{dataEntrega}}]", &context), "[  ]");
    }

    #[test]
    fn test_list_value_is_joined() {
        let context = Context::new().with("locatarios", vec!["Ana", "Bruno"]);
        assert_eq!(substitute("{{locatarios}}", &context), "Ana, Bruno");
    }

    #[test]
    fn test_absent_keys_are_left_in_place() {
        let context = Context::new().with("nome", "Ana");
        assert_eq!(substitute("{{nome}} {{foo}}", &context), "Ana {{foo}}");
    }

    #[test]
    fn test_formatter_failure_falls_back_to_raw() {
        let context = Context::new().with("dataVistoria", "2024-03-01");
        let result = substitute_variables(
            "{{dataVistoria}}",
            &context,
            &RenderOptions::default(),
            &FailingFormatter,
        );
        assert_eq!(result, "2024-03-01");
    }

    #[test]
    fn test_formatter_failure_can_propagate() {
        let context = Context::new().with("dataVistoria", "2024-03-01");
        let err = try_substitute_variables(
            "{{dataVistoria}}",
            &context,
            &RenderOptions::default(),
            &FailingFormatter,
        )
        .unwrap_err();
        assert!(matches!(err, MinutaError::DateFormat { ref field, .. } if field == "dataVistoria"));
    }

    #[test]
    fn test_unreferenced_date_field_is_never_formatted() {
        let context = Context::new().with("dataVistoria", "2024-03-01");
        let result = try_substitute_variables(
            "sem datas",
            &context,
            &RenderOptions::default(),
            &FailingFormatter,
        )
        .unwrap();
        assert_eq!(result, "sem datas");
    }

    #[test]
    fn test_case_helpers() {
        let context = Context::new().with("nome", "Ana Maria");
        assert_eq!(
            substitute("{{upper nome}} {{lower nome}}", &context),
            "ANA MARIA ana maria"
        );
    }

    #[test]
    fn test_currency_helper() {
        let context = Context::new()
            .with("valor", "1500.5")
            .with("multa", "R$ 12.345,6")
            .with("desconto", "-3")
            .with("texto", "a combinar");
        assert_eq!(
            substitute(
                "{{currency valor}}|{{currency multa}}|{{currency desconto}}|{{currency texto}}",
                &context
            ),
            "R$ 1.500,50|R$ 12.345,60|-R$ 3,00|a combinar"
        );
    }

    #[test]
    fn test_number_helper() {
        let context = Context::new()
            .with("area", "1234567.125")
            .with("quartos", "3")
            .with("fracao", "0,5");
        assert_eq!(
            substitute("{{number area}} {{number quartos}} {{number fracao}}", &context),
            "1.234.567,125 3 0,5"
        );
    }

    #[test]
    fn test_dot_thousands_separators_without_comma() {
        let context = Context::new()
            .with("aluguel", "R$ 1.500")
            .with("imovel", "12.345.678")
            .with("caucao", "-2.000");
        assert_eq!(
            substitute(
                "{{currency aluguel}}|{{currency imovel}}|{{currency caucao}}",
                &context
            ),
            "R$ 1.500,00|R$ 12.345.678,00|-R$ 2.000,00"
        );
        assert_eq!(
            substitute("{{number aluguel}}|{{number imovel}}", &context),
            "1.500|12.345.678"
        );
    }

    #[test]
    fn test_dot_decimal_still_parsed_as_fraction() {
        let context = Context::new().with("taxa", "1.5").with("juros", "0.125");
        assert_eq!(
            substitute("{{number taxa}}|{{number juros}}", &context),
            "1,5|0,125"
        );
    }

    #[test]
    fn test_helpers_on_missing_values() {
        let context = Context::new().with("valor", Value::Null);
        assert_eq!(substitute("{{currency valor}} {{upper outro}}", &context), "[CAMPO] {{upper outro}}");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1.234");
        assert_eq!(group_thousands("1234567"), "1.234.567");
    }
}
