//! Tests for snapshots, state hashing and replay determinism

use monetary_core_rs::{
    compute_state_hash, validate_snapshot, AccountId, Bank, BankConfig, BankSnapshot,
    BankSchedule, BankPhase, DeterministicRng, InflationSeries, SnapshotError,
};

/// Small economy: firms borrow and pay wages, households spend back.
/// Returns the state hash after each period.
fn run(seed: u64, periods: usize) -> Vec<String> {
    let mut rng = DeterministicRng::new(seed);
    let mut bank = Bank::new("bank", BankConfig::default());
    let firms: Vec<AccountId> = (0..3)
        .map(|i| bank.open_account(format!("firm-{}", i)).unwrap())
        .collect();
    let households: Vec<AccountId> = (0..6)
        .map(|i| bank.open_account(format!("household-{}", i)).unwrap())
        .collect();
    bank.ownership_mut().share_out_capital(&households[..3]).unwrap();

    let inflation: InflationSeries = (0..periods)
        .map(|p| (p, 0.001 + rng.next_f64() * 0.004))
        .collect();

    let mut hashes = Vec::new();
    for period in 0..periods {
        bank.execute(BankPhase::Opening, period, &inflation).unwrap();
        bank.execute(BankPhase::RateSetting, period, &inflation).unwrap();

        for &firm in &firms {
            if rng.chance(0.3) {
                let amount = rng.range(1_000, 20_000);
                let term = rng.range(1, 36) as usize;
                bank.borrow(firm, amount, term, rng.chance(0.5)).unwrap();
            }
            let household = households[rng.range(0, households.len() as i64) as usize];
            let available = bank.account(firm).unwrap().amount();
            if available > 0 {
                let wage = rng.range(1, available + 1);
                let cheque = bank.issue_cheque(firm, household, wage).unwrap();
                bank.deposit(household, cheque).unwrap();
            }
        }
        for &household in &households {
            let firm = firms[rng.range(0, firms.len() as i64) as usize];
            let available = bank.account(household).unwrap().amount();
            if available > 1 {
                let spend = rng.range(1, available);
                let cheque = bank.issue_cheque(household, firm, spend).unwrap();
                bank.deposit(firm, cheque).unwrap();
            }
        }

        bank.execute(BankPhase::DebtRecovery, period, &inflation).unwrap();
        bank.execute(BankPhase::PayDividends, period, &inflation).unwrap();
        bank.execute(BankPhase::Closure, period, &inflation).unwrap();

        let snapshot = bank.snapshot();
        validate_snapshot(&snapshot).unwrap();
        hashes.push(compute_state_hash(&snapshot).unwrap());
    }
    hashes
}

#[test]
fn test_same_seed_same_hashes() {
    assert_eq!(run(2024, 24), run(2024, 24));
}

#[test]
fn test_different_seed_different_hashes() {
    assert_ne!(run(1, 12), run(2, 12));
}

#[test]
fn test_snapshot_reflects_ledger() {
    let mut bank = Bank::new("bank", BankConfig::default());
    let firm = bank.open_account("firm").unwrap();
    let worker = bank.open_account("worker").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 5_000, 12, true).unwrap();
    let outstanding = bank.issue_cheque(firm, worker, 700).unwrap();

    let snapshot = bank.snapshot();
    assert_eq!(snapshot.period, Some(0));
    assert_eq!(snapshot.accounts.len(), 2);
    assert_eq!(snapshot.accounts[0].deposit, 5_000);
    assert_eq!(snapshot.accounts[0].loans.len(), 1);
    assert_eq!(
        snapshot.accounts[0].pending_cheque.map(|c| c.amount),
        Some(700)
    );
    assert_eq!(snapshot.totals.capital, 0);
    assert!(validate_snapshot(&snapshot).is_ok());

    bank.deposit(worker, outstanding).unwrap();
}

#[test]
fn test_debt_total_mismatch_detected() {
    let mut bank = Bank::new("bank", BankConfig::default());
    let firm = bank.open_account("firm").unwrap();
    bank.open(0).unwrap();
    bank.borrow(firm, 5_000, 12, true).unwrap();

    let mut snapshot: BankSnapshot = bank.snapshot();
    snapshot.totals.overdue_debt = 10;
    let err = validate_snapshot(&snapshot).unwrap_err();
    assert!(matches!(err, SnapshotError::ValidationError(ref msg) if msg.contains("Debt total")));
}

#[test]
fn test_book_value_mismatch_detected() {
    let mut bank = Bank::new("bank", BankConfig::default());
    let owners: Vec<AccountId> = (0..2)
        .map(|i| bank.open_account(format!("owner-{}", i)).unwrap())
        .collect();
    bank.ownership_mut().share_out_capital(&owners).unwrap();
    bank.ownership_mut().set_book_value(1_000).unwrap();

    let mut snapshot = bank.snapshot();
    assert_eq!(snapshot.ownership.certificates[0].book_value, 500);
    snapshot.ownership.certificates[0].book_value += 1;
    assert!(validate_snapshot(&snapshot).is_err());
}

#[test]
fn test_schedule_serializes_by_name() {
    let json = serde_json::to_string(&BankSchedule::standard()).unwrap();
    assert!(json.contains("\"debt_recovery\""));
    let parsed: BankSchedule = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, BankSchedule::standard());
}
