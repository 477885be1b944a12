// Basketball valuation engine: category z-scores, replacement baseline,
// auction dollars, ADP market blend, and rank reconciliation.

pub mod valuation;
