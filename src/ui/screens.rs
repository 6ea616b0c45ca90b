use uuid::Uuid;

use crate::models::Coin;

/// The coin list: the last sorted snapshot pulled from the store plus the
/// filtered view that is actually rendered.
pub(crate) struct CoinListScreen {
    pub(crate) coins: Vec<Coin>,
    pub(crate) visible: Vec<Coin>,
    pub(crate) missing_only: bool,
    pub(crate) selected: usize,
}

impl CoinListScreen {
    pub(crate) fn new(coins: Vec<Coin>) -> Self {
        let mut screen = Self {
            visible: Vec::new(),
            coins,
            missing_only: false,
            selected: 0,
        };
        screen.apply_filter();
        screen
    }

    /// Rebuild `visible` from the snapshot. Order is inherited from the
    /// snapshot, so the filtered list keeps the store's sort.
    pub(crate) fn apply_filter(&mut self) {
        self.visible = if self.missing_only {
            self.coins
                .iter()
                .filter(|coin| !coin.is_collected)
                .cloned()
                .collect()
        } else {
            self.coins.clone()
        };
        self.ensure_in_bounds();
    }

    pub(crate) fn toggle_missing_only(&mut self) -> bool {
        let focus = self.current_coin().map(|coin| coin.id);
        self.missing_only = !self.missing_only;
        self.apply_filter();
        if let Some(id) = focus {
            self.select_id(id);
        }
        self.missing_only
    }

    /// Replace the snapshot after a mutation, keeping the cursor on `focus`
    /// when it is still visible and on the same row index otherwise.
    pub(crate) fn set_coins(&mut self, coins: Vec<Coin>, focus: Option<Uuid>) {
        self.coins = coins;
        self.apply_filter();
        if let Some(id) = focus {
            self.select_id(id);
        }
    }

    pub(crate) fn current_coin(&self) -> Option<&Coin> {
        self.visible.get(self.selected)
    }

    pub(crate) fn collected_count(&self) -> usize {
        self.coins.iter().filter(|coin| coin.is_collected).count()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let len = self.visible.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.visible.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.visible.is_empty() {
            self.selected = self.visible.len() - 1;
        }
    }

    fn select_id(&mut self, id: Uuid) {
        if let Some(index) = self.visible.iter().position(|coin| coin.id == id) {
            self.selected = index;
        }
    }

    fn ensure_in_bounds(&mut self) {
        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }
}
