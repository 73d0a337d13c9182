//! Static bilingual wording printed on e-tickets.

use charter_shared::{CharterKind, Localized, TripKind};

pub fn trip_label(trip: TripKind) -> Localized {
    match trip {
        TripKind::OneWay => Localized::new("One way", "Aller simple"),
        TripKind::RoundTrip => Localized::new("Round trip", "Aller-retour"),
    }
}

pub fn outbound_label() -> Localized {
    Localized::new("Outbound", "Aller")
}

pub fn return_label() -> Localized {
    Localized::new("Return", "Retour")
}

pub fn payment_status(settled: bool) -> Localized {
    if settled {
        Localized::new("Paid", "Payé")
    } else {
        Localized::new("Unpaid, billed under contract", "Non payé, facturé sous contrat")
    }
}

/// Baggage and boarding rules differ by aircraft type
pub fn legal_notices(kind: CharterKind) -> Vec<Localized> {
    let mut notices = match kind {
        CharterKind::Helicopter => vec![
            Localized::new(
                "Baggage is limited to 15 kg per passenger, soft-sided bags only.",
                "Les bagages sont limités à 15 kg par passager, sacs souples uniquement.",
            ),
            Localized::new(
                "Passenger and baggage weights must be declared at check-in for the load sheet.",
                "Le poids des passagers et des bagages doit être déclaré à l'enregistrement.",
            ),
            Localized::new(
                "Please report to the helipad 30 minutes before departure.",
                "Veuillez vous présenter à l'héliport 30 minutes avant le départ.",
            ),
        ],
        CharterKind::Plane => vec![
            Localized::new(
                "Checked baggage is limited to 20 kg plus one 5 kg cabin bag per passenger.",
                "Les bagages enregistrés sont limités à 20 kg plus un bagage cabine de 5 kg par passager.",
            ),
            Localized::new(
                "Check-in closes 60 minutes before departure.",
                "L'enregistrement ferme 60 minutes avant le départ.",
            ),
        ],
    };

    notices.push(Localized::new(
        "A valid photo ID or passport is required for boarding.",
        "Une pièce d'identité avec photo ou un passeport valide est exigé pour l'embarquement.",
    ));
    notices.push(Localized::new(
        "Departure times may change for weather or safety reasons; the operator will contact you.",
        "Les horaires peuvent changer pour des raisons météorologiques ou de sécurité; l'opérateur vous contactera.",
    ));
    notices
}
