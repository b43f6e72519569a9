//! Classification, category table and budget advice commands

use anyhow::{bail, Result};
use finora_core::ai::AIBackend;
use finora_core::{allocate, categories, classify, classify_with_backend, AIClient};

use super::money;

pub async fn cmd_classify(
    description: &str,
    amount: Option<f64>,
    keywords_only: bool,
) -> Result<()> {
    let ai = if keywords_only {
        None
    } else {
        AIClient::from_env()
    };

    let result = match ai {
        Some(ref client) => {
            println!("🤖 Classifying with {} ({})", client.model(), client.host());
            classify_with_backend(client, description, amount).await
        }
        None => classify(description, amount),
    };

    println!();
    println!("   {} {}", result.glyph, result.category);
    println!("   Group:      {}", result.category_group.as_str());
    println!("   Confidence: {:.0}%", result.confidence * 100.0);

    Ok(())
}

pub fn cmd_categories() -> Result<()> {
    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────────────");

    for info in categories::all() {
        println!(
            "   {} {:<15} {:<6} {}",
            info.glyph,
            info.name,
            info.group.as_str(),
            info.color
        );
    }

    Ok(())
}

pub fn cmd_advice(income: f64) -> Result<()> {
    if !income.is_finite() || income <= 0.0 {
        bail!("Income must be a positive number");
    }

    let advice = allocate(income);

    println!();
    println!("💷 {} for {}", advice.rule, money(advice.monthly_income));
    println!("   ─────────────────────────────────────");
    println!(
        "   Needs   ({:.0}%): {:>12}   {}",
        advice.percentages.needs * 100.0,
        money(advice.amounts.needs),
        advice.categories.needs.join(", ")
    );
    println!(
        "   Wants   ({:.0}%): {:>12}   {}",
        advice.percentages.wants * 100.0,
        money(advice.amounts.wants),
        advice.categories.wants.join(", ")
    );
    println!(
        "   Savings ({:.0}%): {:>12}   {}",
        advice.percentages.savings * 100.0,
        money(advice.amounts.savings),
        advice.categories.savings.join(", ")
    );

    Ok(())
}
