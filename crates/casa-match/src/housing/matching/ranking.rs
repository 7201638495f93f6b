use crate::housing::listings::Listing;

/// Moves partner listings ahead of the rest without reordering either group.
pub fn rank_partner_first(listings: Vec<Listing>) -> Vec<Listing> {
    let (mut partners, others): (Vec<_>, Vec<_>) =
        listings.into_iter().partition(Listing::is_partner);
    partners.extend(others);
    partners
}
