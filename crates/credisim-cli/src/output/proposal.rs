use chrono::Local;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{result_of, table};

/// Plain-text sales proposal for a `simulate` result. Other results fall
/// back to the table view.
pub fn print_proposal(value: &Value) {
    match render_proposal(value, &Local::now().format("%d/%m/%Y").to_string()) {
        Some(text) => print!("{}", text),
        None => {
            eprintln!("proposal output needs a simulation result; showing table instead");
            table::print_table(value);
        }
    }
}

fn render_proposal(value: &Value, date: &str) -> Option<String> {
    let result = result_of(value);
    let schedule = result.get("schedule")?;
    let plan = result.get("consortium")?;
    let comparison = result.get("comparison")?;
    let assumptions = value.get("assumptions");

    let mut out = String::new();
    out.push_str("CREDIT PROPOSAL\n");
    out.push_str(&format!("Date: {}\n\n", date));

    out.push_str("Financing\n");
    if result.get("down_payment").is_some() {
        line(&mut out, "Down payment", money(result.get("down_payment")));
    }
    line(&mut out, "Financed amount", money(result.get("principal")));
    line(&mut out, "Amortization", text(schedule.get("method")).map(|m| m.to_uppercase()));
    line(&mut out, "Term (months)", text(schedule.get("term_months")));
    line(&mut out, "First installment", money(schedule.get("first_installment")));
    line(&mut out, "Last installment", money(schedule.get("last_installment")));
    line(&mut out, "Total interest", money(schedule.get("total_interest")));
    line(&mut out, "Total paid", money(schedule.get("total_paid")));

    out.push_str("\nConsortium\n");
    line(
        &mut out,
        "Credit letter",
        money(assumptions.and_then(|a| a.get("credit_value"))),
    );
    line(&mut out, "Plan total", money(plan.get("plan_total")));
    line(&mut out, "Installment", money(plan.get("base_installment")));
    line(
        &mut out,
        "After bid",
        money(plan.get("bid_reduction").and_then(|b| b.get("installment"))),
    );
    line(&mut out, "Total bid", money(plan.get("total_bid")));
    line(
        &mut out,
        "Bid (% of credit)",
        percent(plan.get("bid_pct_of_credit")),
    );
    line(
        &mut out,
        "Contemplation",
        text(plan.get("contemplation").and_then(|c| c.get("label"))),
    );
    line(
        &mut out,
        "Bid ranking",
        text(plan.get("competitiveness").and_then(|c| c.get("label"))),
    );
    line(&mut out, "Total cost", money(plan.get("total_cost")));

    out.push_str("\nRecommendation\n");
    line(&mut out, "Financing score", text(comparison.get("financing_score")));
    line(&mut out, "Consortium score", text(comparison.get("consortium_score")));
    line(&mut out, "Cost difference", money(comparison.get("cost_difference")));
    line(&mut out, "Recommended", text(comparison.get("recommended_label")));
    if comparison.get("tie_broken").and_then(Value::as_bool) == Some(true) {
        out.push_str("  (scores were level; tie-break applied)\n");
    }

    out.push_str(
        "\nFigures are estimates for discussion. Contemplation depends on the group's \
         draws and bids and is not guaranteed.\n",
    );
    Some(out)
}

fn line(out: &mut String, label: &str, value: Option<String>) {
    let shown = value.unwrap_or_else(|| "-".to_string());
    out.push_str(&format!("  {:<20} {}\n", format!("{}:", label), shown));
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn decimal(value: Option<&Value>) -> Option<Decimal> {
    text(value)?.parse::<Decimal>().ok()
}

fn money(value: Option<&Value>) -> Option<String> {
    decimal(value).map(format_brl)
}

fn percent(value: Option<&Value>) -> Option<String> {
    decimal(value).map(|d| format!("{}%", d.round_dp(2).normalize()))
}

/// `R$ 1,234,567.89` with two decimals.
fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (digits.clone(), String::new()),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}R$ {}.{:0<2}", sign, grouped, frac_part)
}
