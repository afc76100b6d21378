//! Price-tier selection over departures.

use crate::domain::Departure;

/// Keep the leading run of departures sharing the first price.
///
/// This is the "best price" filter: the first departure is always kept, and
/// following ones are kept while their price equals the first price. Any
/// different price ends the tier, a lower one as well as a higher one.
///
/// The backend lists itineraries cheapest first, so the leading run is the
/// cheapest tier and only a higher price can end it. Input in any other
/// order yields the leading run, which is not necessarily the cheapest.
pub fn cheapest_tier(departures: Vec<Departure>) -> Vec<Departure> {
    let Some(first) = departures.first() else {
        return departures;
    };
    let price = first.price;

    departures
        .into_iter()
        .take_while(|departure| departure.price == price)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Price;

    fn departure(code: &str, price: u32) -> Departure {
        Departure::new(code.to_string(), Price::from(price), code.to_string(), vec![])
    }

    fn prices(departures: &[Departure]) -> Vec<Price> {
        departures.iter().map(|d| d.price).collect()
    }

    #[test]
    fn keeps_leading_tier() {
        let input = vec![
            departure("A", 100),
            departure("B", 100),
            departure("C", 100),
            departure("D", 150),
            departure("E", 150),
        ];
        let tier = cheapest_tier(input);

        assert_eq!(tier.len(), 3);
        let codes: Vec<_> = tier.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B", "C"]);
    }

    #[test]
    fn stops_at_first_higher_price() {
        let tier = cheapest_tier(vec![departure("A", 100), departure("B", 150)]);
        assert_eq!(prices(&tier), vec![Price::from(100)]);
    }

    #[test]
    fn single_departure() {
        let tier = cheapest_tier(vec![departure("A", 100)]);
        assert_eq!(prices(&tier), vec![Price::from(100)]);
    }

    #[test]
    fn empty_input() {
        assert!(cheapest_tier(vec![]).is_empty());
    }

    #[test]
    fn lower_price_also_ends_tier() {
        let tier = cheapest_tier(vec![
            departure("A", 150),
            departure("B", 150),
            departure("C", 100),
        ]);
        assert_eq!(prices(&tier), vec![Price::from(150), Price::from(150)]);
    }

    #[test]
    fn equal_price_after_gap_is_dropped() {
        let tier = cheapest_tier(vec![
            departure("A", 100),
            departure("B", 150),
            departure("C", 100),
        ]);
        assert_eq!(tier.len(), 1);
    }
}
