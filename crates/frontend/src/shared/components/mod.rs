pub mod badges;
pub mod feedback;
pub mod filter_panel;
pub mod pagination_controls;
pub mod stat_card;
