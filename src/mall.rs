//! Freebie Vault and VIP Exclusives. Claims live for the session only.

use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::anyhow;

use crate::error::EmpireError;
use crate::seed;
use crate::types::ShopItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MallTab {
    #[default]
    Free,
    Vip,
}

impl MallTab {
    pub fn title(&self) -> &'static str {
        match self {
            MallTab::Free => "Freebie Vault",
            MallTab::Vip => "VIP Exclusives",
        }
    }
}

impl FromStr for MallTab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" | "freebies" => Ok(MallTab::Free),
            "vip" => Ok(MallTab::Vip),
            other => Err(anyhow!("unknown mall tab `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed(String),
    AlreadyClaimed(String),
}

impl ClaimOutcome {
    pub fn message(&self) -> String {
        match self {
            ClaimOutcome::Claimed(name) => {
                format!("✨ Omg yay! You claimed the {}! It's so sick, babygirl. Check your Imperial Inventory. ✨", name)
            }
            ClaimOutcome::AlreadyClaimed(name) => format!("{} is already in your Imperial Inventory.", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mall {
    freebies: Vec<ShopItem>,
    vip: Vec<ShopItem>,
    claimed: BTreeSet<String>,
}

impl Default for Mall {
    fn default() -> Self { Self::new() }
}

impl Mall {
    pub fn new() -> Self { Self { freebies: seed::freebies(), vip: seed::vip_items(), claimed: BTreeSet::new() } }

    pub fn catalog(&self, tab: MallTab) -> &[ShopItem] {
        match tab {
            MallTab::Free => &self.freebies,
            MallTab::Vip => &self.vip,
        }
    }

    pub fn is_claimed(&self, id: &str) -> bool { self.claimed.contains(id) }

    pub fn claimed(&self) -> impl Iterator<Item = &str> { self.claimed.iter().map(String::as_str) }

    pub fn claim(&mut self, id: &str) -> Result<ClaimOutcome, EmpireError> {
        let item = self
            .freebies
            .iter()
            .chain(self.vip.iter())
            .find(|i| i.id == id)
            .ok_or_else(|| EmpireError::UnknownShopItem(id.to_string()))?;
        let name = item.name.clone();
        if self.claimed.insert(id.to_string()) { Ok(ClaimOutcome::Claimed(name)) } else { Ok(ClaimOutcome::AlreadyClaimed(name)) }
    }
}
