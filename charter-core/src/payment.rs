use serde::{Deserialize, Serialize};
use charter_shared::{Currency, Localized};

/// Currency a cash payment settles in.
///
/// The exchange-rate override only exists on the local-currency variant, so
/// switching currency or method drops it without any clearing logic.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "currency", rename_all = "UPPERCASE")]
pub enum CashSettlement {
    Usd,
    Htg {
        #[serde(default)]
        exchange_rate: Option<f64>,
    },
}

/// Payment method selected on the booking form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash { settlement: CashSettlement },
    Card,
    BankTransfer,
    MobileMoney,
    /// No payment taken at booking; billed under a corporate contract
    Contract,
}

/// Method selector without payload, as sent by the form's dropdown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    Cash,
    Card,
    BankTransfer,
    MobileMoney,
    Contract,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash {
            settlement: CashSettlement::Usd,
        }
    }
}

impl PaymentMethod {
    pub fn from_kind(kind: PaymentMethodKind) -> Self {
        match kind {
            PaymentMethodKind::Cash => PaymentMethod::default(),
            PaymentMethodKind::Card => PaymentMethod::Card,
            PaymentMethodKind::BankTransfer => PaymentMethod::BankTransfer,
            PaymentMethodKind::MobileMoney => PaymentMethod::MobileMoney,
            PaymentMethodKind::Contract => PaymentMethod::Contract,
        }
    }

    pub fn kind(&self) -> PaymentMethodKind {
        match self {
            PaymentMethod::Cash { .. } => PaymentMethodKind::Cash,
            PaymentMethod::Card => PaymentMethodKind::Card,
            PaymentMethod::BankTransfer => PaymentMethodKind::BankTransfer,
            PaymentMethod::MobileMoney => PaymentMethodKind::MobileMoney,
            PaymentMethod::Contract => PaymentMethodKind::Contract,
        }
    }

    /// Currency the customer actually pays in
    pub fn settlement_currency(&self) -> Currency {
        match self {
            PaymentMethod::Cash {
                settlement: CashSettlement::Htg { .. },
            } => Currency::Htg,
            _ => Currency::REFERENCE,
        }
    }

    /// Raw override as entered; callers decide whether it is usable
    pub fn exchange_rate(&self) -> Option<f64> {
        match self {
            PaymentMethod::Cash {
                settlement: CashSettlement::Htg { exchange_rate },
            } => *exchange_rate,
            _ => None,
        }
    }

    /// Everything but the contract placeholder is collected at booking
    pub fn is_settled(&self) -> bool {
        !matches!(self, PaymentMethod::Contract)
    }

    pub fn label(&self) -> Localized {
        match self {
            PaymentMethod::Cash { .. } => Localized::new("Cash", "Espèces"),
            PaymentMethod::Card => Localized::new("Credit card", "Carte de crédit"),
            PaymentMethod::BankTransfer => Localized::new("Bank transfer", "Virement bancaire"),
            PaymentMethod::MobileMoney => Localized::new("Mobile money", "Paiement mobile"),
            PaymentMethod::Contract => Localized::new("Contract", "Contrat"),
        }
    }
}
