use gate_engine::formulas::*;
use gate_engine::params::{BaseRates, EconomicsConfig, FormulaWeights, NetworkTargets, SettlementParams};
use gate_engine::{run_epoch, EpochParameters, MarketWindowState};
use proptest::prelude::*;

fn weights() -> FormulaWeights {
    FormulaWeights::default()
}

fn rates() -> BaseRates {
    BaseRates::default()
}

prop_compose! {
    fn arb_params()(
        validators in 1u64..500_000,
        holders in 1.0f64..1e8,
        price in 0.05f64..5.0,
        tx in 0.0f64..1e8,
        liquidity in 0.0f64..=1.0,
        buys in 0.0f64..1e12,
        sells in 0.0f64..1e12,
        reserve in 0.0f64..1e8,
        balance in 0.0f64..1e6,
        days in 0.0f64..365.0,
    ) -> EpochParameters {
        EpochParameters::builder(validators, holders, price)
            .daily_transactions(tx)
            .liquidity_ratio(liquidity)
            .buys_volume(buys)
            .sells_volume(sells)
            .stability_reserve(reserve)
            .avg_holding_balance(balance)
            .days_held(days)
            .avg_transaction_size(5_000.0)
            .build()
            .unwrap()
    }
}

proptest! {
    #[test]
    fn pressure_is_bounded(
        buys in 0.0f64..1e13,
        sells in 0.0f64..1e13,
        pool in 1.0f64..1e9,
        validators in 0u64..1_000_000,
    ) {
        let p = market_pressure(buys, sells, pool, validators);
        prop_assert!((-1.0..=1.0).contains(&p), "pressure {}", p);
    }

    #[test]
    fn pressure_sign_follows_net_flow(
        buys in 1.0f64..1e12,
        sells in 1.0f64..1e12,
        pool in 1.0f64..1e9,
    ) {
        let p = market_pressure(buys, sells, pool, 5_000);
        if buys > sells { prop_assert!(p >= 0.0); }
        if sells > buys { prop_assert!(p <= 0.0); }
    }

    #[test]
    fn psi_respects_floor_and_cap(
        price in 0.001f64..100.0,
        pressure in -1.0f64..=1.0,
        vp in 0.0f64..100.0,
        hp in 0.0f64..100.0,
    ) {
        let psi = price_stability_index(price, pressure, vp, hp, &weights());
        prop_assert!((0.3..=1.0).contains(&psi), "psi {}", psi);
    }

    #[test]
    fn nus_is_unit_bounded(volume in 0.0f64..1e13, transfers in 0.0f64..1e7) {
        let nus = network_utility_score(volume, transfers, &NetworkTargets::default(), &weights());
        prop_assert!((0.0..=1.0).contains(&nus));
    }

    #[test]
    fn lhi_respects_floor_and_cap(
        participants in 0.0f64..1e6,
        holders in 0.0f64..1e8,
        liquidity in 0.0f64..=1.0,
        reserve in 0.0f64..1e9,
    ) {
        let lhi = liquidity_health_index(
            participants, holders, liquidity, reserve, 1_000_000.0,
            &NetworkTargets::default(), &weights(),
        );
        prop_assert!((0.2..=1.0).contains(&lhi), "lhi {}", lhi);
    }

    #[test]
    fn settlement_is_bounded(
        tx in 0.0f64..1e10,
        validators in 0u64..1_000_000,
        liquidity in 0.0f64..=1.0,
        pressure in -1.0f64..=1.0,
    ) {
        let s = settlement_rate(tx, validators, liquidity, pressure, &NetworkTargets::default(), &SettlementParams::default());
        prop_assert!((0.0..=0.999).contains(&s), "settlement {}", s);
    }

    #[test]
    fn holder_cost_grows_with_time_held(
        days in 0.0f64..365.0,
        extra in 0.0f64..365.0,
        balance in 0.0f64..1e6,
        psi in 0.3f64..=1.0,
    ) {
        let r = rates();
        prop_assert!(holder_cost(days + extra, balance, psi, &r) >= holder_cost(days, balance, psi, &r));
    }

    #[test]
    fn validator_reward_grows_with_volume(
        tx in 0.0f64..1e9,
        extra in 0.0f64..1e9,
        validators in 1u64..100_000,
        psi in 0.3f64..=1.0,
    ) {
        let r = rates();
        prop_assert!(validator_reward(tx + extra, validators, psi, &r) >= validator_reward(tx, validators, psi, &r));
    }

    #[test]
    fn emergency_spread_is_capped(liquidity in 0.0f64..=1.0) {
        let r = rates();
        let cap = EconomicsConfig::default().breakers.emergency_spread_cap;
        prop_assert!(emergency_spread(liquidity, cap, &r) <= r.spread * cap + 1e-18);
    }

    #[test]
    fn convergence_is_zero_at_peg(pressure in -1.0f64..=1.0, psi in 0.3f64..=1.0) {
        prop_assert_eq!(convergence_rate(1.0, 1.0, pressure, psi), 0.0);
    }

    #[test]
    fn epoch_is_deterministic_and_in_range(params in arb_params()) {
        let mut w1 = MarketWindowState::default();
        let mut w2 = MarketWindowState::default();
        let a = run_epoch(0, &params, &mut w1).unwrap();
        let b = run_epoch(0, &params, &mut w2).unwrap();
        prop_assert_eq!(&a, &b);

        prop_assert!((0.3..=1.0).contains(&a.price_stability_index));
        prop_assert!((0.0..=1.0).contains(&a.network_utility_score));
        prop_assert!((0.2..=1.0).contains(&a.liquidity_health_index));
        prop_assert!((-1.0..=1.0).contains(&a.market_pressure));
        prop_assert!((0.0..=0.999).contains(&a.settlement_rate));
        prop_assert!(a.convergence_rate.is_finite() && a.convergence_rate >= 0.0);
        prop_assert!([8, 9, 10].contains(&a.epoch_duration));
        prop_assert_eq!(a.equilibrium.is_equilibrium, a.equilibrium.failing_metrics.is_empty());
    }
}
