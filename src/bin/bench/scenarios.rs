// Scenario Definitions: four market regimes x three participation shapes
// Each scenario is a starting point; the stabilization policy drives the rest

use gate_engine::{EngineError, EpochParameters};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    pub validator_count: u64,
    pub total_holders: f64,
    pub daily_transactions: f64,
    pub current_price: f64,
    pub avg_transaction_size: f64,
    pub avg_holding_balance: f64,
    pub days_held: f64,
    pub liquidity_ratio: f64,
    pub cross_chain_transfers: f64,
    pub buys_volume: f64,
    pub sells_volume: f64,
    pub criteria: PassCriteria,
}

pub struct PassCriteria {
    /// Largest tolerated |final price - 1|.
    pub max_final_deviation: f64,
    pub require_no_final_halt: bool,
    /// Upper bound on rebase epochs over the whole run.
    pub max_rebases: Option<usize>,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            max_final_deviation: 0.02,
            require_no_final_halt: true,
            max_rebases: None,
        }
    }
}

impl Scenario {
    /// Validated starting parameters. Stability reserve keeps its default.
    pub fn initial_params(&self) -> Result<EpochParameters, EngineError> {
        EpochParameters::builder(self.validator_count, self.total_holders, self.current_price)
            .daily_transactions(self.daily_transactions)
            .avg_transaction_size(self.avg_transaction_size)
            .avg_holding_balance(self.avg_holding_balance)
            .days_held(self.days_held)
            .liquidity_ratio(self.liquidity_ratio)
            .cross_chain_transfers(self.cross_chain_transfers)
            .buys_volume(self.buys_volume)
            .sells_volume(self.sells_volume)
            .build()
    }
}

// ─── Catalogue ──────────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        // ═══ Stable ══════════════════════════════════════════════════════
        Scenario {
            name: "STABLE_TX_HEAVY",
            label: "Stable - More Transactions Than Validators",
            category: "stable",
            validator_count: 5_000,
            total_holders: 1_000_000.0,
            daily_transactions: 35_000_000.0,
            current_price: 1.001,
            avg_transaction_size: 6_000.0,
            avg_holding_balance: 10_000.0,
            days_held: 30.0,
            liquidity_ratio: 0.8,
            cross_chain_transfers: 100_000.0,
            buys_volume: 109e9,
            sells_volume: 109e9,
            criteria: PassCriteria { max_rebases: Some(0), ..PassCriteria::default() },
        },
        Scenario {
            name: "STABLE_HOLDER_HEAVY",
            label: "Stable - More Holders Than Transactions",
            category: "stable",
            validator_count: 5_000,
            total_holders: 50_000_000.0,
            daily_transactions: 35_000_000.0,
            current_price: 1.002,
            avg_transaction_size: 6_000.0,
            avg_holding_balance: 8_000.0,
            days_held: 90.0,
            liquidity_ratio: 0.8,
            cross_chain_transfers: 80_000.0,
            buys_volume: 109e9,
            sells_volume: 109e9,
            criteria: PassCriteria { max_rebases: Some(0), ..PassCriteria::default() },
        },
        Scenario {
            name: "STABLE_VALIDATOR_HEAVY",
            label: "Stable - More Validators Than Transactions",
            category: "stable",
            validator_count: 100_000,
            total_holders: 1_000_000.0,
            daily_transactions: 50_000.0,
            current_price: 1.001,
            avg_transaction_size: 100_000.0,
            avg_holding_balance: 15_000.0,
            days_held: 30.0,
            liquidity_ratio: 0.85,
            cross_chain_transfers: 10_000.0,
            buys_volume: 5e9,
            sells_volume: 5e9,
            criteria: PassCriteria { max_rebases: Some(0), ..PassCriteria::default() },
        },
        // ═══ High Pressure ═══════════════════════════════════════════════
        Scenario {
            name: "PRESSURE_TX_HEAVY",
            label: "High Pressure - More Transactions Than Validators",
            category: "high_pressure",
            validator_count: 4_000,
            total_holders: 800_000.0,
            daily_transactions: 50_000_000.0,
            current_price: 1.4,
            avg_transaction_size: 8_000.0,
            avg_holding_balance: 12_000.0,
            days_held: 15.0,
            liquidity_ratio: 0.6,
            cross_chain_transfers: 200_000.0,
            buys_volume: 180e9,
            sells_volume: 60e9,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "PRESSURE_HOLDER_HEAVY",
            label: "High Pressure - More Holders Than Transactions",
            category: "high_pressure",
            validator_count: 4_000,
            total_holders: 60_000_000.0,
            daily_transactions: 45_000_000.0,
            current_price: 1.35,
            avg_transaction_size: 7_500.0,
            avg_holding_balance: 11_000.0,
            days_held: 20.0,
            liquidity_ratio: 0.65,
            cross_chain_transfers: 180_000.0,
            buys_volume: 160e9,
            sells_volume: 70e9,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "PRESSURE_VALIDATOR_HEAVY",
            label: "High Pressure - More Validators Than Transactions",
            category: "high_pressure",
            validator_count: 150_000,
            total_holders: 800_000.0,
            daily_transactions: 40_000.0,
            current_price: 1.25,
            avg_transaction_size: 150_000.0,
            avg_holding_balance: 13_000.0,
            days_held: 25.0,
            liquidity_ratio: 0.7,
            cross_chain_transfers: 15_000.0,
            buys_volume: 4e9,
            sells_volume: 2e9,
            criteria: PassCriteria::default(),
        },
        // ═══ Liquidity Crisis ════════════════════════════════════════════
        Scenario {
            name: "CRISIS_TX_HEAVY",
            label: "Crisis - More Transactions Than Validators",
            category: "crisis",
            validator_count: 2_500,
            total_holders: 600_000.0,
            daily_transactions: 70_000_000.0,
            current_price: 0.7,
            avg_transaction_size: 4_000.0,
            avg_holding_balance: 8_000.0,
            days_held: 5.0,
            liquidity_ratio: 0.15,
            cross_chain_transfers: 500_000.0,
            buys_volume: 40e9,
            sells_volume: 160e9,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "CRISIS_HOLDER_HEAVY",
            label: "Crisis - More Holders Than Transactions",
            category: "crisis",
            validator_count: 2_000,
            total_holders: 80_000_000.0,
            daily_transactions: 65_000_000.0,
            current_price: 0.65,
            avg_transaction_size: 3_800.0,
            avg_holding_balance: 7_500.0,
            days_held: 10.0,
            liquidity_ratio: 0.2,
            cross_chain_transfers: 450_000.0,
            buys_volume: 35e9,
            sells_volume: 150e9,
            criteria: PassCriteria::default(),
        },
        Scenario {
            name: "CRISIS_VALIDATOR_HEAVY",
            label: "Crisis - More Validators Than Transactions",
            category: "crisis",
            validator_count: 200_000,
            total_holders: 500_000.0,
            daily_transactions: 30_000.0,
            current_price: 0.75,
            avg_transaction_size: 200_000.0,
            avg_holding_balance: 6_000.0,
            days_held: 15.0,
            liquidity_ratio: 0.25,
            cross_chain_transfers: 8_000.0,
            buys_volume: 3e9,
            sells_volume: 9e9,
            criteria: PassCriteria::default(),
        },
        // ═══ Recovery ════════════════════════════════════════════════════
        Scenario {
            name: "RECOVERY_TX_HEAVY",
            label: "Recovery - More Transactions Than Validators",
            category: "recovery",
            validator_count: 3_500,
            total_holders: 750_000.0,
            daily_transactions: 45_000_000.0,
            current_price: 0.98,
            avg_transaction_size: 5_000.0,
            avg_holding_balance: 9_000.0,
            days_held: 25.0,
            liquidity_ratio: 0.75,
            cross_chain_transfers: 150_000.0,
            buys_volume: 120e9,
            sells_volume: 90e9,
            criteria: PassCriteria { max_rebases: Some(0), ..PassCriteria::default() },
        },
        Scenario {
            name: "RECOVERY_HOLDER_HEAVY",
            label: "Recovery - More Holders Than Transactions",
            category: "recovery",
            validator_count: 3_000,
            total_holders: 70_000_000.0,
            daily_transactions: 40_000_000.0,
            current_price: 0.97,
            avg_transaction_size: 4_800.0,
            avg_holding_balance: 8_500.0,
            days_held: 35.0,
            liquidity_ratio: 0.7,
            cross_chain_transfers: 130_000.0,
            buys_volume: 110e9,
            sells_volume: 85e9,
            criteria: PassCriteria { max_rebases: Some(0), ..PassCriteria::default() },
        },
        Scenario {
            name: "RECOVERY_VALIDATOR_HEAVY",
            label: "Recovery - More Validators Than Transactions",
            category: "recovery",
            validator_count: 180_000,
            total_holders: 700_000.0,
            daily_transactions: 35_000.0,
            current_price: 0.99,
            avg_transaction_size: 175_000.0,
            avg_holding_balance: 9_500.0,
            days_held: 40.0,
            liquidity_ratio: 0.8,
            cross_chain_transfers: 12_000.0,
            buys_volume: 3.5e9,
            sells_volume: 2.8e9,
            criteria: PassCriteria { max_rebases: Some(0), ..PassCriteria::default() },
        },
    ]
}
