//! Price command implementation

use super::parse_probability;
use crate::config::StakingConfig;
use crate::market::Market;
use crate::staking::EdgeCalculator;
use clap::Args;

#[derive(Args, Debug)]
pub struct PriceArgs {
    /// Market label, e.g. "Top 20", "make_cut", "matchup_2"
    #[arg(long)]
    pub market: String,

    /// Model win probability, a fraction in [0, 1]
    #[arg(long, value_parser = parse_probability)]
    pub prob: f64,

    /// Best decimal odds
    #[arg(long)]
    pub odds: Option<f64>,
}

impl PriceArgs {
    pub fn execute(&self, config: &StakingConfig) -> anyhow::Result<()> {
        let market = Market::classify(&self.market);
        let calculator = EdgeCalculator::from_config(config);
        let pricing = calculator.price(Some(self.prob), self.odds, &market);
        let stake = pricing.raw_stake.min(config.max_bet_units());
        let plan = pricing.into_plan(stake);

        println!("Market:           {}", market);
        println!("Multiplier:       {:.2}", calculator.multiplier(&market));
        println!("Edge:             {:+.2}%", plan.edge_prob * 100.0);
        println!("EV / unit:        {:+.4}", plan.ev_per_unit);
        println!("Full Kelly:       {:.4}", plan.kelly_full);
        println!("Fractional Kelly: {:.4}", plan.kelly_frac);
        println!("Raw stake:        {:.2}u", pricing.raw_stake);
        println!("Stake (uncapped by exposure): {:.2}u", plan.stake_units);
        if !plan.is_value(config.min_edge) {
            println!("Below value threshold ({:.0}% edge)", config.min_edge * 100.0);
        }
        Ok(())
    }
}
