use std::io;
use chrono::Local;
use log::info;
use crate::config::Config;
use crate::db::Ledger;
use crate::form::{prompt_form, RecordForm};
use crate::live_edit;
use crate::parser;
use crate::parser::Statement::{Add, AddInteractive, Browse, Categories, Dashboard, Delete, Export, Help, History, Summary};

mod export;
mod history;
mod report;

const HELP: &str = "\
Commands (end with ';' at the prompt):
  ADD [EXPENSE|INCOME] [<category> <amount> ['description'] [ON yyyy-mm-dd]]
  HISTORY [WHERE <condition>] [LIMIT n]
  BROWSE [WHERE <condition>]
  DASHBOARD [WHERE <condition>]
  SUMMARY [BY day|month|category|day,category|month,category] [WHERE <condition>]
  CATEGORIES [EXPENSE|INCOME]
  DELETE id[, id ...]
  EXPORT TO 'file.csv|file.json|file.txt|file.xlsx'
  HELP

Conditions, combined with AND / OR from left to right:
  type = income|expense|all      category = 'Other Expense'|all
  date = 2024-01-31              date between 2024-01-01 and 2024-01-31
  month = 3                      month = 2024-03
  month between 2024-01 and 2024-03
  year = 2024                    amount >= 100
  desc like 'coffee'";

pub(crate) fn parse_and_run_command(ledger: &mut Ledger, config: &Config, command: &str) -> anyhow::Result<()> {
    let statement = parser::parse(command)?;

    match statement {
        Add(form) => {
            add_record(ledger, config, &form)?;
        },
        AddInteractive(kind) => {
            let form = prompt_form(kind, &config.categories, &mut io::stdin().lock(), &mut io::stdout())?;
            add_record(ledger, config, &form)?;
        },
        History(condition, limit) => {
            let transactions = ledger.query(condition.as_ref());
            println!("{}", history::render_history(history::last_n(&transactions, limit)));
        },
        Browse(condition) => {
            ledger.query(condition.as_ref());
            if let Some(ids) = ledger.last_query_results.clone() {
                live_edit::browse(ids, ledger)?;
            }
        },
        Dashboard(condition) => {
            let transactions = ledger.query(condition.as_ref());
            println!("{}", report::render_dashboard(&transactions, config.chart_width));
        },
        Summary(group_by, condition) => {
            let transactions = ledger.query(condition.as_ref());
            println!("{}", report::render_summary(&transactions, group_by));
        },
        Categories(kind) => {
            println!("{}", report::render_categories(&config.categories, kind));
        },
        Delete(ids) => {
            let deleted = ledger.delete(&ids)?;
            info!("{deleted} records deleted.");
        },
        Export(file_path) => {
            let exported = export::export(ledger, &file_path)?;
            info!("{exported} records exported to {file_path}");
        },
        Help => println!("{HELP}"),
    }

    Ok(())
}

/// Validate the form and save the record
fn add_record(ledger: &mut Ledger, config: &Config, form: &RecordForm) -> anyhow::Result<()> {
    let record = form.validate(&config.categories, Local::now().naive_local())?;
    let t = ledger.insert(record)?;
    info!("Record saved successfully! (id {})", t.id);
    Ok(())
}
