//! End-to-end integration tests
//!
//! These tests drive the ledger through its public API only: the facade,
//! the dispatcher request types and the CLI run loop. They cover:
//! - Importing the same ledger from CSV, JSON and YAML fixtures
//! - Export/import round trips in every format
//! - Balance rules (debits, insufficient funds, deletes)
//! - Import skipping of records with unresolved references
//! - The binary's convert-and-summarize flow
//!
//! Fixture ledgers are located in tests/fixtures/.

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_finance_ledger::cli::{self, CliArgs};
    use rust_finance_ledger::core::{LedgerFacade, LedgerStore, Repository};
    use rust_finance_ledger::types::{
        CategoryData, CommandOutput, CommandRequest, CommandResponse, DomainKind, ErrorClass,
        ImportReport, LedgerError, LedgerFormat, OperationData, OperationType, Payload,
    };
    use std::ffi::OsString;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::str::FromStr;
    use tempfile::TempDir;

    fn fixture(name: &str) -> PathBuf {
        Path::new("tests/fixtures").join(name)
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn import_fixture(name: &str) -> (LedgerFacade, ImportReport) {
        let path = fixture(name);
        assert!(path.exists(), "Fixture not found: {}", path.display());
        let format = LedgerFormat::from_path(&path).unwrap();

        let mut facade = LedgerFacade::new();
        let report = facade
            .import(&path, format)
            .unwrap_or_else(|e| panic!("Failed to import {}: {}", name, e));
        (facade, report)
    }

    /// Assert two stores hold field-for-field equal entities, ids included
    fn assert_same_ledger(actual: &LedgerStore, expected: &LedgerStore) {
        assert_eq!(actual.accounts().all(), expected.accounts().all());
        assert_eq!(actual.categories().all(), expected.categories().all());
        assert_eq!(actual.operations().all(), expected.operations().all());
    }

    /// A ledger with gaps in its ids, optional descriptions and both signs
    fn varied_ledger() -> LedgerFacade {
        let mut facade = LedgerFacade::new();
        facade.create_account("Checking", dec("1000.50")).unwrap();
        facade.create_account("Closed", Decimal::ZERO).unwrap();
        facade.create_account("Savings", dec("250")).unwrap();
        facade.create_category("Salary", true).unwrap();
        facade.create_category("Unused", false).unwrap();
        facade.create_category("Groceries", false).unwrap();
        facade.delete_account(1).unwrap();
        facade.delete_category(1).unwrap();

        facade
            .create_operation(OperationData {
                op_type: OperationType::Credit,
                account_id: 0,
                amount: dec("2500.25"),
                category_id: 0,
                description: Some("Salary for May".to_string()),
            })
            .unwrap();
        facade.withdraw(0, 2, dec("99.99")).unwrap();
        facade.transfer(0, 2, 2, dec("300")).unwrap();
        facade
    }

    #[rstest]
    #[case::csv("household.csv")]
    #[case::json("household.json")]
    #[case::yaml("household.yaml")]
    fn test_household_fixture_imports(#[case] name: &str) {
        let (mut facade, report) = import_fixture(name);

        assert_eq!(
            report,
            ImportReport { accounts: 2, categories: 3, operations: 3, skipped: 0 }
        );
        assert_eq!(facade.get_account(0).unwrap().unwrap().balance(), dec("1250.75"));
        assert_eq!(facade.get_account(2).unwrap().unwrap().balance(), dec("5000"));
        assert!(facade.get_category(0).unwrap().unwrap().is_positive());

        let rent = facade.get_operation(1).unwrap().unwrap();
        assert_eq!(rent.op_type(), OperationType::Debit);
        assert_eq!(rent.description(), None);
        let groceries = facade.get_operation(4).unwrap().unwrap();
        assert_eq!(groceries.description(), Some("weekly shop, bakery"));
        assert_eq!(groceries.date().to_string(), "2024-02-03 17:45:10.500");

        // counters continue past the highest imported ids
        assert_eq!(facade.create_account("New", Decimal::ZERO).unwrap().id(), 3);
        assert_eq!(facade.create_category("New", true).unwrap().id(), 4);
        assert_eq!(facade.deposit(0, 0, Decimal::ONE).unwrap().id(), 5);
    }

    #[test]
    fn test_household_fixtures_agree_across_formats() {
        let (csv, _) = import_fixture("household.csv");
        let (json, _) = import_fixture("household.json");
        let (yaml, _) = import_fixture("household.yaml");

        assert_same_ledger(json.store(), csv.store());
        assert_same_ledger(yaml.store(), csv.store());
    }

    #[rstest]
    fn test_export_import_round_trip(
        #[values(LedgerFormat::Csv, LedgerFormat::Json, LedgerFormat::Yaml)] format: LedgerFormat,
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(format!("ledger.{}", format.extension()));
        let mut original = varied_ledger();

        original.export(&path, format).unwrap();
        let mut restored = LedgerFacade::new();
        let report = restored.import(&path, format).unwrap();

        assert_eq!(
            report,
            ImportReport { accounts: 2, categories: 2, operations: 4, skipped: 0 }
        );
        assert_same_ledger(restored.store(), original.store());
    }

    #[rstest]
    fn test_exact_values_survive_round_trip(
        #[values(LedgerFormat::Csv, LedgerFormat::Json, LedgerFormat::Yaml)] format: LedgerFormat,
        #[values(
            dec("12345678901234567.89"),
            dec("0.1234567890123456789"),
            Decimal::MAX
        )]
        value: Decimal,
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(format!("ledger.{}", format.extension()));
        let mut original = LedgerFacade::new();
        original.create_account(" Padded name ", value).unwrap();
        original.create_account("Target", Decimal::ZERO).unwrap();
        original.create_category(" Gifts ", true).unwrap();
        original.deposit(1, 0, value).unwrap();

        original.export(&path, format).unwrap();
        let mut restored = LedgerFacade::new();
        restored.import(&path, format).unwrap();

        let account = restored.get_account(0).unwrap().unwrap();
        assert_eq!(account.name(), " Padded name ");
        assert_eq!(account.balance(), value);
        assert_eq!(restored.get_account(1).unwrap().unwrap().balance(), value);
        assert_eq!(restored.get_operation(0).unwrap().unwrap().amount(), value);
        assert_same_ledger(restored.store(), original.store());
    }

    #[test]
    fn test_debit_survives_csv_export_flush_import() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        let mut facade = LedgerFacade::new();

        let account = facade.create_account("Test", dec("100.0")).unwrap();
        let category = facade.create_category("Test cat", true).unwrap();
        assert_eq!(account.id(), 0);
        assert_eq!(category.id(), 0);

        facade
            .create_operation(OperationData {
                op_type: OperationType::Debit,
                account_id: 0,
                amount: dec("20.0"),
                category_id: 0,
                description: None,
            })
            .unwrap();
        assert_eq!(facade.get_account(0).unwrap().unwrap().balance(), dec("80.0"));

        facade.export(&path, LedgerFormat::Csv).unwrap();
        facade.flush();
        assert_eq!(facade.get_account(0).unwrap(), None);

        facade.import(&path, LedgerFormat::Csv).unwrap();
        assert_eq!(facade.get_account(0).unwrap().unwrap().balance(), dec("80.0"));
        assert_eq!(facade.store().operations().len(), 1);
    }

    #[test]
    fn test_overdraft_is_rejected() {
        let mut facade = LedgerFacade::new();
        facade.create_account("Low", dec("50.0")).unwrap();
        facade.create_category("Food", false).unwrap();

        let result = facade.withdraw(0, 0, dec("80.0"));

        assert_eq!(
            result,
            Err(LedgerError::insufficient_funds(0, dec("50.0"), dec("80.0")))
        );
        assert_eq!(facade.get_account(0).unwrap().unwrap().balance(), dec("50.0"));
        assert!(facade.store().operations().is_empty());
    }

    #[test]
    fn test_balance_tracks_running_sum() {
        let mut facade = LedgerFacade::new();
        facade.create_account("Main", dec("10")).unwrap();
        facade.create_category("Misc", true).unwrap();
        let steps = [
            (OperationType::Credit, "5.5"),
            (OperationType::Debit, "15.5"),
            (OperationType::Debit, "0.01"),
            (OperationType::Credit, "100"),
            (OperationType::Debit, "99.99"),
        ];
        let mut expected = dec("10");

        for (op_type, amount) in steps {
            let amount = dec(amount);
            let result = match op_type {
                OperationType::Credit => facade.deposit(0, 0, amount),
                OperationType::Debit => facade.withdraw(0, 0, amount),
            };
            let candidate = expected + op_type.sign(amount);
            if candidate < Decimal::ZERO {
                assert_eq!(result.unwrap_err().class(), ErrorClass::InsufficientFunds);
            } else {
                result.unwrap();
                expected = candidate;
            }
            assert_eq!(facade.get_account(0).unwrap().unwrap().balance(), expected);
        }
        assert_eq!(expected, dec("0.01"));
    }

    #[test]
    fn test_delete_missing_account_is_noop() {
        let mut facade = LedgerFacade::new();
        facade.create_account("Only", dec("1")).unwrap();

        let response =
            CommandResponse::from(facade.execute(&CommandRequest::delete(DomainKind::Account, 5)));

        assert!(response.success);
        assert_eq!(response.data, CommandOutput::None);
        assert_eq!(facade.store().accounts().len(), 1);
    }

    #[test]
    fn test_mismatched_payload_is_rejected() {
        let mut facade = LedgerFacade::new();
        let request = CommandRequest::create(
            DomainKind::Operation,
            Payload::Category(CategoryData {
                name: "Oops".to_string(),
                is_positive: true,
            }),
        );

        let response = CommandResponse::from(facade.execute(&request));

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Validation error: expected operation payload, got category")
        );
        assert!(facade.store().categories().is_empty());
        assert_eq!(facade.statistics().unwrap().count, 0);
    }

    #[test]
    fn test_unresolved_category_is_skipped_on_import() {
        let (facade, report) = import_fixture("dangling_category.json");

        assert_eq!(
            report,
            ImportReport { accounts: 1, categories: 2, operations: 2, skipped: 1 }
        );
        let ids: Vec<_> = facade
            .store()
            .operations()
            .iter()
            .map(|op| op.id())
            .collect();
        assert_eq!(ids, vec![0, 2]);
        // imported balances are taken as-is, operations are not replayed
        assert_eq!(facade.store().account(0).unwrap().balance(), dec("150.5"));
    }

    #[rstest]
    fn test_operation_with_deleted_account_is_dropped_on_reimport(
        #[values(LedgerFormat::Csv, LedgerFormat::Json, LedgerFormat::Yaml)] format: LedgerFormat,
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(format!("ledger.{}", format.extension()));
        let mut facade = LedgerFacade::new();
        facade.create_account("Gone", dec("10")).unwrap();
        facade.create_account("Kept", dec("10")).unwrap();
        facade.create_category("Misc", false).unwrap();
        facade.withdraw(0, 0, dec("1")).unwrap();
        facade.withdraw(1, 0, dec("2")).unwrap();
        facade.delete_account(0).unwrap();

        facade.export(&path, format).unwrap();
        facade.flush();
        let report = facade.import(&path, format).unwrap();

        assert_eq!(report.operations, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(facade.store().operation(1).unwrap().account_id(), 1);
    }

    #[test]
    fn test_malformed_import_leaves_ledger_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(
            &path,
            "=== Accounts ===\nid,name,balance\n0,Cash,10\n1,Card,not-a-number\n",
        )
        .unwrap();
        let mut facade = LedgerFacade::new();
        facade.create_account("Existing", dec("3")).unwrap();

        let result = facade.import(&path, LedgerFormat::Csv);

        match result {
            Err(LedgerError::Parse { line, .. }) => assert_eq!(line, Some(4)),
            other => panic!("expected a parse error, got {:?}", other),
        }
        assert_eq!(facade.store().accounts().len(), 1);
        assert_eq!(facade.store().account(0).unwrap().name(), "Existing");
    }

    #[test]
    fn test_cli_converts_and_prints_summary() {
        let dir = TempDir::new().unwrap();
        let output_path = dir.path().join("converted.yaml");
        let input = fixture("household.csv");
        let args = CliArgs::try_parse_from([
            OsString::from("finance-ledger"),
            input.into_os_string(),
            OsString::from("--output"),
            output_path.clone().into_os_string(),
            OsString::from("--stats"),
        ])
        .unwrap();
        let mut output = Vec::new();

        cli::run(&args, &mut output).unwrap();

        let printed = String::from_utf8(output).unwrap();
        let mut lines = printed.lines();
        assert_eq!(lines.next(), Some("id,name,balance"));
        assert_eq!(lines.next(), Some("0,Checking,1250.75"));
        assert_eq!(lines.next(), Some("2,Savings,5000"));
        assert!(lines.next().unwrap().starts_with("commands: 2,"));

        let mut converted = LedgerFacade::new();
        converted.import(&output_path, LedgerFormat::Yaml).unwrap();
        let (source, _) = import_fixture("household.csv");
        assert_same_ledger(converted.store(), source.store());
    }

    #[test]
    fn test_cli_rejects_unknown_input_format() {
        let args = CliArgs::try_parse_from(["finance-ledger", "ledger.txt"]).unwrap();
        let mut output = Vec::new();

        let result = cli::run(&args, &mut output);

        assert_eq!(result.unwrap_err().class(), ErrorClass::Validation);
        assert!(output.is_empty());
    }
}
