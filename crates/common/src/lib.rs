pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_total_adds_all_stores() {
        let s = types::Summary { users: 2, items: 3, slots: 4 };
        assert_eq!(s.total(), 9);
    }
}
