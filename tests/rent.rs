use monopoly_rs::state::GameState;

fn mk_game() -> GameState {
    GameState::new(2, 7)
}

#[test]
fn base_rent_without_monopoly() {
    let mut g = mk_game();
    g.purchase_property(0, 21).unwrap();
    assert_eq!(g.rent_for(21, 8), 18);
}

#[test]
fn undeveloped_monopoly_doubles_base_rent_per_property() {
    let mut g = mk_game();
    for pos in [21, 23, 24] {
        g.purchase_property(0, pos).unwrap();
    }
    // Each red street doubles its own base rent, not the group's sum.
    assert_eq!(g.rent_for(21, 8), 36);
    assert_eq!(g.rent_for(23, 8), 36);
    assert_eq!(g.rent_for(24, 8), 40);
}

#[test]
fn houses_override_the_monopoly_double() {
    let mut g = mk_game();
    for pos in [21, 23, 24] {
        g.purchase_property(0, pos).unwrap();
    }
    g.build_house(0, 21).unwrap();
    assert_eq!(g.rent_for(21, 8), 90);
    g.build_house(0, 21).unwrap();
    assert_eq!(g.rent_for(21, 8), 250);
}

#[test]
fn hotel_rent_uses_the_top_of_the_table() {
    let mut g = mk_game();
    g.credit(0, 2000);
    g.purchase_property(0, 37).unwrap();
    g.purchase_property(0, 39).unwrap();
    for _ in 0..4 {
        g.build_house(0, 39).unwrap();
    }
    g.build_hotel(0, 39).unwrap();
    assert_eq!(g.rent_for(39, 8), 2000);
}

#[test]
fn mortgaged_property_earns_zero_no_matter_what() {
    let mut g = mk_game();
    for pos in [21, 23, 24] {
        g.purchase_property(0, pos).unwrap();
    }
    g.mortgage(0, 21).unwrap();
    assert_eq!(g.rent_for(21, 8), 0);
    // The rest of the monopoly still charges double.
    assert_eq!(g.rent_for(23, 8), 36);
}

#[test]
fn unowned_property_earns_zero() {
    let g = mk_game();
    assert_eq!(g.rent_for(21, 8), 0);
}

#[test]
fn railroad_rent_scales_with_count() {
    let mut g = mk_game();
    g.purchase_property(0, 5).unwrap();
    assert_eq!(g.rent_for(5, 7), 25);
    g.purchase_property(0, 15).unwrap();
    assert_eq!(g.rent_for(5, 7), 50);
    g.purchase_property(0, 25).unwrap();
    assert_eq!(g.rent_for(5, 7), 100);
    g.purchase_property(0, 35).unwrap();
    assert_eq!(g.rent_for(5, 7), 200);
    assert_eq!(g.rent_for(35, 7), 200, "every railroad in the set charges the same");
}

#[test]
fn railroads_owned_by_different_players_do_not_stack() {
    let mut g = mk_game();
    g.purchase_property(0, 5).unwrap();
    g.purchase_property(1, 15).unwrap();
    assert_eq!(g.rent_for(5, 7), 25);
    assert_eq!(g.rent_for(15, 7), 25);
}

#[test]
fn utility_rent_is_a_dice_multiple() {
    let mut g = mk_game();
    g.purchase_property(0, 12).unwrap();
    assert_eq!(g.rent_for(12, 7), 28);
    assert_eq!(g.rent_for(12, 11), 44);
    g.purchase_property(0, 28).unwrap();
    assert_eq!(g.rent_for(12, 7), 70);
    assert_eq!(g.rent_for(28, 4), 40);
}
