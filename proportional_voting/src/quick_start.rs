/*!

# Quick start

This example walks through the allocation of the 31 seats of a Junta
Departamental from a departmental tally.

Suppose the valid votes of a department break down as follows:

| Party | Votes |
|-------|-------|
| Partido A | 1200 |
| Partido B | 800 |
| Partido C | 500 |

The vote shares are 48.0%, 32.0% and 20.0% of the 2500 valid votes. Plain
D'Hondt over 31 seats would award 15, 10 and 6 seats. Article 272 of the
constitution guarantees the winning party an absolute majority of 16, so
the winner is pinned to 16 and the remaining 15 seats are re-distributed
among the other parties:

```
use proportional_voting::{allocate_seats, PartyTally, SeatRules};

let tally = vec![
    PartyTally::new("Partido A", 1200),
    PartyTally::new("Partido B", 800),
    PartyTally::new("Partido C", 500),
];

let res = allocate_seats(&tally, &SeatRules::DEPARTMENTAL_JUNTA).unwrap();
assert_eq!(res.winner, "Partido A");
assert!(res.floor_applied);

let seats: Vec<u32> = res.seats.iter().map(|p| p.seats).collect();
assert_eq!(seats, vec![16, 9, 6]);
```

Municipal councils work the same way with [`SeatRules::MUNICIPAL_COUNCIL`]
(5 seats, 3 for the winner), and the seats a party won are split among its
lists with [`allocate_list_seats`]:

```
use proportional_voting::{allocate_list_seats, ListTally};

let lists = vec![
    ListTally { number: 90, name: "LISTA 90".to_string(), votes: 600 },
    ListTally { number: 71, name: "LISTA 71".to_string(), votes: 300 },
];

let split = allocate_list_seats(&lists, 3);
assert_eq!(split[0].seats, 2);
assert_eq!(split[1].seats, 1);
```

For tallies accumulated from several sources, see
[`builder::Builder`](crate::builder::Builder).

[`SeatRules::MUNICIPAL_COUNCIL`]: crate::SeatRules::MUNICIPAL_COUNCIL
[`allocate_list_seats`]: crate::allocate_list_seats

*/
