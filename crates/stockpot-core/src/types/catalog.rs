//! The static catalog of tradable goods.

use serde::Serialize;

use crate::types::GoodId;

/// Static description of a tradable good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoodSpec {
    /// Catalog index
    pub id: GoodId,
    /// Display name
    pub name: &'static str,
    /// Ticker symbol
    pub symbol: &'static str,
    /// Company issuing the stock
    pub company: &'static str,
    /// Building whose count raises the warehouse limit for this good
    pub building: &'static str,
}

const fn good(
    id: u8,
    name: &'static str,
    symbol: &'static str,
    company: &'static str,
    building: &'static str,
) -> GoodSpec {
    GoodSpec {
        id: GoodId::new(id),
        name,
        symbol,
        company,
        building,
    }
}

/// Every good the market can list, in catalog order.
pub const CATALOG: [GoodSpec; 18] = [
    good(0, "Cereals", "CRL", "Old Mills", "Farm"),
    good(1, "Chocolate", "CHC", "Cocoa Diggers", "Mine"),
    good(2, "Butter", "BTR", "Churnworks", "Factory"),
    good(3, "Sugar", "SUG", "Sweet Trust", "Bank"),
    good(4, "Nuts", "NUT", "Shell Offerings", "Temple"),
    good(5, "Salt", "SLT", "Brine Arcana", "Wizard tower"),
    good(6, "Vanilla", "VNL", "Orbital Pods", "Shipment"),
    good(7, "Eggs", "EGG", "Transmuted Yolks", "Alchemy lab"),
    good(8, "Cinnamon", "CNM", "Beyond Spice", "Portal"),
    good(9, "Cream", "CRM", "Paradox Dairy", "Time machine"),
    good(10, "Jam", "JAM", "Condensed Preserves", "Antimatter condenser"),
    good(11, "White chocolate", "WCH", "Refracted Cocoa", "Prism"),
    good(12, "Honey", "HNY", "Lucky Hives", "Chancemaker"),
    good(13, "Cookies", "CKI", "Recursive Bakers", "Fractal engine"),
    good(14, "Recipes", "RCP", "Scripted Kitchens", "Javascript console"),
    good(15, "Subsidiaries", "SBD", "Parallel Holdings", "Idleverse"),
    good(16, "Publicists", "PBL", "Thinking Press", "Cortex baker"),
    good(17, "Yeast", "YST", "Self Starter", "You"),
];

impl GoodSpec {
    /// Looks up a good by id.
    pub fn get(id: GoodId) -> Option<&'static GoodSpec> {
        CATALOG.get(id.index())
    }

    /// Looks up a good by ticker symbol, ignoring case.
    pub fn by_symbol(symbol: &str) -> Option<&'static GoodSpec> {
        let symbol = symbol.trim();
        CATALOG
            .iter()
            .find(|spec| spec.symbol.eq_ignore_ascii_case(symbol))
    }
}
