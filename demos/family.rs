//! Converts a small bilingual form to configuration text and back.
//!
//! Run with: cargo run --example family

use cueform::{decode, from_str, sheet, to_string, Workbook};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    workbook.insert_sheet(
        "survey",
        sheet![
            ["type", "name", "label::English (en)", "label::French (fr)"],
            ["text", "family_name", "What's your family name?", "Quel est votre nom de famille ?"],
            ["begin_group", "father", "Father", "Père"],
            ["integer", "age", "How old is your father?", "Quel âge a votre père ?"],
            ["select_one yes_no", "alive", "Is he alive?", "Est-il vivant ?"],
            ["end_group"],
        ],
    );
    workbook.insert_sheet(
        "choices",
        sheet![
            ["list_name", "name", "label::English (en)", "label::French (fr)"],
            ["yes_no", "yes", "Yes", "Oui"],
            ["yes_no", "no", "No", "Non"],
        ],
    );

    let text = to_string(&workbook)?;
    println!("Configuration:\n{}", text);

    let back = from_str(&text)?;
    assert_eq!(decode(&back)?, decode(&workbook)?);
    for row in &back.sheet("survey").ok_or("survey sheet missing")?.rows {
        println!("{}", row.join(" | "));
    }
    println!("✓ Round-trip successful");

    Ok(())
}
