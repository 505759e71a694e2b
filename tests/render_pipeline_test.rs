//! End-to-end tests for the rendering pipeline through the public API

use minuta::template::{extract_variables, sample_context, validate_template};
use minuta::{render, try_render, Context, MinutaError, RenderOptions, Renderer, Value};
use proptest::prelude::*;

const POWER_OF_ATTORNEY: &str = r#"PROCURAÇÃO

OUTORGANTE: {{upper nomeOutorgante}}, residente em {{endereco}}.
{{#eq estadoCivil "casado"}}Cônjuge: {{conjuge}}.
{{/eq}}{{#if procuradores}}PROCURADORES:
{{#each procuradores}}{{@index}}. {{this}}
{{/each}}{{#else}}Sem procuradores nomeados.
{{/if}}{{#unless revogavel}}Esta procuração é irrevogável.
{{/unless}}Valor da causa: {{currency valorCausa}}
{{cidade}}, {{dataAssinatura}}.
{{observacao}}"#;

fn power_of_attorney_context() -> Context {
    Context::new()
        .with("nomeOutorgante", "Maria da Silva")
        .with("endereco", Value::Null)
        .with("estadoCivil", "casado")
        .with("conjuge", "José da Silva")
        .with("procuradores", vec!["Dr. Paulo Reis", "Dra. Lúcia Melo"])
        .with("revogavel", "")
        .with("valorCausa", "15000.5")
        .with("cidade", "Belo Horizonte")
        .with("dataAssinatura", "2024-07-15")
        .with("observacao", "")
}

#[test]
fn test_power_of_attorney_document() {
    let rendered = render(
        POWER_OF_ATTORNEY,
        &power_of_attorney_context(),
        &RenderOptions::default(),
    );

    let expected = "PROCURAÇÃO

OUTORGANTE: MARIA DA SILVA, residente em [CAMPO].
Cônjuge: José da Silva.
PROCURADORES:
0. Dr. Paulo Reis
1. Dra. Lúcia Melo
Esta procuração é irrevogável.
Valor da causa: R$ 15.000,50
Belo Horizonte, 15/07/2024.
";
    assert_eq!(rendered, expected);
}

#[test]
fn test_template_analysis_agrees_with_render() {
    let report = validate_template(POWER_OF_ATTORNEY);
    assert!(report.is_valid, "{:?}", report.errors);

    let variables = extract_variables(POWER_OF_ATTORNEY);
    assert_eq!(variables.first().map(String::as_str), Some("nomeOutorgante"));
    assert!(variables.contains(&"procuradores".to_string()));
    assert!(!variables.contains(&"this".to_string()));

    let sample = sample_context(POWER_OF_ATTORNEY);
    let rendered = render(POWER_OF_ATTORNEY, &sample, &RenderOptions::default());
    assert!(rendered.contains("procuradores 1"));
    assert!(!rendered.contains("{{"));
}

#[test]
fn test_context_from_json_record() {
    let record = serde_json::json!({
        "nomeOutorgante": "Ana",
        "procuradores": ["X", "Y"],
        "parcelas": 12,
        "ativo": true,
        "endereco": null
    });
    let context = Context::from_json(&record).unwrap();

    let rendered = render(
        "{{nomeOutorgante}}|{{#each procuradores}}{{this}}{{/each}}|{{parcelas}}|{{ativo}}|{{endereco}}",
        &context,
        &RenderOptions::default(),
    );
    assert_eq!(rendered, "Ana|XY|12|true|[CAMPO]");
}

#[test]
fn test_unknown_fields_are_removed_or_kept() {
    let context = Context::new().with("nome", "Ana");
    let template = "{{nome}} {{sobrenome}} {{#with x}}";

    assert_eq!(
        render(template, &context, &RenderOptions::default()),
        "Ana  "
    );
    assert_eq!(
        render(template, &context, &RenderOptions::default().with_cleanup(false)),
        "Ana {{sobrenome}} {{#with x}}"
    );
}

#[test]
fn test_strict_render_reports_the_field() {
    let context = Context::new().with("dataVencimento", "2023-13-01");
    let err = try_render("{{dataVencimento}}", &context, &RenderOptions::default())
        .unwrap_err();

    match err {
        MinutaError::DateFormat { field, .. } => assert_eq!(field, "dataVencimento"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_renderer_reuse() {
    let renderer = Renderer::new(RenderOptions::default().with_missing_field_placeholder("___"));
    let first = renderer.render("{{a}}", &Context::new().with("a", ""));
    let second = renderer.render("{{a}}", &Context::new().with("a", "ok"));
    assert_eq!(first, "___");
    assert_eq!(second, "ok");
}

fn field_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn template_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[A-Za-z ,.]{0,10}",
            field_name().prop_map(|n| format!("{{{{{}}}}}", n)),
            field_name().prop_map(|n| format!("{{{{#if {}}}}}", n)),
            Just("{{#else}}".to_string()),
            Just("{{/if}}".to_string()),
            field_name().prop_map(|n| format!("{{{{#each {}}}}}{{{{this}}}}", n)),
            Just("{{/each}}".to_string()),
        ],
        0..12,
    )
    .prop_map(|parts| parts.concat())
}

fn context() -> impl Strategy<Value = Context> {
    prop::collection::vec((field_name(), "[A-Za-z ]{0,6}"), 0..6)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_render_is_deterministic(template in template_text(), context in context()) {
        let options = RenderOptions::default();
        prop_assert_eq!(
            render(&template, &context, &options),
            render(&template, &context, &options)
        );
    }

    #[test]
    fn prop_cleaned_output_has_no_open_delimiter(
        template in template_text(),
        context in context(),
    ) {
        let rendered = render(&template, &context, &RenderOptions::default());
        prop_assert!(!rendered.contains("{{"));
    }

    #[test]
    fn prop_render_is_idempotent(template in template_text(), context in context()) {
        let options = RenderOptions::default();
        let once = render(&template, &context, &options);
        prop_assume!(!once.contains("{{"));

        let twice = render(&once, &context, &options);
        prop_assert_eq!(once, twice);
    }
}
