//! The xAstro maker-fee pattern.

use feescan_core::error::FeeError;
use feescan_core::fee::FeeRecord;
use feescan_core::rule::Rule;
use feescan_core::types::Attribute;

/// Astroport maker contract on Terra Classic.
pub const MAKER_ADDRESS: &str = "terra12u7hcmpltazmmnq0fvyl225usn3fy6qqlp05w0";

/// CW20 transfers whose recipient is the maker.
pub fn xastro_fee_rule() -> Rule {
    Rule::new("wasm")
        .any("contract_address")
        .exact("action", "transfer")
        .any("from")
        .exact("to", MAKER_ADDRESS)
        .any("amount")
}

/// Positions of the token and amount attributes inside a matched run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeFields {
    pub token: usize,
    pub amount: usize,
}

impl Default for FeeFields {
    /// Layout of [`xastro_fee_rule`].
    fn default() -> Self {
        Self { token: 0, amount: 4 }
    }
}

impl FeeFields {
    /// Turn a matched run into a fee record.
    pub fn extract(&self, matched: &[Attribute]) -> Result<Option<FeeRecord>, FeeError> {
        let token = matched
            .get(self.token)
            .ok_or(FeeError::MissingAttribute { index: self.token })?;
        let amount = matched
            .get(self.amount)
            .ok_or(FeeError::MissingAttribute { index: self.amount })?;
        FeeRecord::parse(token.value.as_str(), &amount.value).map(Some)
    }
}

/// Transform for [`xastro_fee_rule`] matches.
pub fn fee_from_match(_rule: &Rule, matched: &[Attribute]) -> Result<Option<FeeRecord>, FeeError> {
    FeeFields::default().extract(matched)
}
