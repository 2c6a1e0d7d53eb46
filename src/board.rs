use std::fmt;

/// Number of spaces around the board.
pub const BOARD_SIZE: u8 = 40;
/// Position of the Go space.
pub const GO_POSITION: u8 = 0;
/// Position of the Jail / Just Visiting space.
pub const JAIL_POSITION: u8 = 10;
/// Salary credited for passing or landing on Go via a forward move.
pub const GO_SALARY: u64 = 200;
/// Fine for buying your way out of jail.
pub const JAIL_FINE: u64 = 50;

/// The eight street color groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

impl ColorGroup {
    pub const ALL: [ColorGroup; 8] = [
        ColorGroup::Brown,
        ColorGroup::LightBlue,
        ColorGroup::Pink,
        ColorGroup::Orange,
        ColorGroup::Red,
        ColorGroup::Yellow,
        ColorGroup::Green,
        ColorGroup::DarkBlue,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ColorGroup::Brown => "brown",
            ColorGroup::LightBlue => "light blue",
            ColorGroup::Pink => "pink",
            ColorGroup::Orange => "orange",
            ColorGroup::Red => "red",
            ColorGroup::Yellow => "yellow",
            ColorGroup::Green => "green",
            ColorGroup::DarkBlue => "dark blue",
        }
    }
}

impl fmt::Display for ColorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What kind of purchasable site a space is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyClass {
    Street(ColorGroup),
    Railroad,
    Utility,
}

impl PropertyClass {
    pub const fn color_group(self) -> Option<ColorGroup> {
        match self {
            PropertyClass::Street(g) => Some(g),
            _ => None,
        }
    }
}

/// Space behavior, as dispatched by landing resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceKind {
    Go,
    /// Jail / Just Visiting. Landing here by movement has no effect.
    Jail,
    FreeParking,
    GoToJail,
    Chance,
    CommunityChest,
    Tax {
        amount: u64,
    },
    /// A purchasable site. `rent` is indexed by house count for streets
    /// (base, 1-4 houses, hotel) and by owned-count - 1 for railroads;
    /// utilities carry no table (rent is a dice multiple).
    Site {
        class: PropertyClass,
        price: u64,
        rent: &'static [u64],
        house_cost: u64,
        mortgage: u64,
    },
}

/// One board space: fixed name plus behavior.
#[derive(Debug, Clone, Copy)]
pub struct Space {
    pub name: &'static str,
    pub kind: SpaceKind,
}

const fn street(
    name: &'static str,
    group: ColorGroup,
    price: u64,
    rent: &'static [u64; 6],
    house_cost: u64,
    mortgage: u64,
) -> Space {
    Space {
        name,
        kind: SpaceKind::Site {
            class: PropertyClass::Street(group),
            price,
            rent,
            house_cost,
            mortgage,
        },
    }
}

const RAILROAD_RENT: [u64; 4] = [25, 50, 100, 200];

const fn railroad(name: &'static str) -> Space {
    Space {
        name,
        kind: SpaceKind::Site {
            class: PropertyClass::Railroad,
            price: 200,
            rent: &RAILROAD_RENT,
            house_cost: 0,
            mortgage: 100,
        },
    }
}

const fn utility(name: &'static str) -> Space {
    Space {
        name,
        kind: SpaceKind::Site {
            class: PropertyClass::Utility,
            price: 150,
            rent: &[],
            house_cost: 0,
            mortgage: 75,
        },
    }
}

static SPACES: [Space; BOARD_SIZE as usize] = [
    Space { name: "Go", kind: SpaceKind::Go },
    street("Mediterranean Avenue", ColorGroup::Brown, 60, &[2, 10, 30, 90, 160, 250], 50, 30),
    Space { name: "Community Chest", kind: SpaceKind::CommunityChest },
    street("Baltic Avenue", ColorGroup::Brown, 60, &[4, 20, 60, 180, 320, 450], 50, 30),
    Space { name: "Income Tax", kind: SpaceKind::Tax { amount: 200 } },
    railroad("Reading Railroad"),
    street("Oriental Avenue", ColorGroup::LightBlue, 100, &[6, 30, 90, 270, 400, 550], 50, 50),
    Space { name: "Chance", kind: SpaceKind::Chance },
    street("Vermont Avenue", ColorGroup::LightBlue, 100, &[6, 30, 90, 270, 400, 550], 50, 50),
    street("Connecticut Avenue", ColorGroup::LightBlue, 120, &[8, 40, 100, 300, 450, 600], 50, 60),
    Space { name: "Jail", kind: SpaceKind::Jail },
    street("St. Charles Place", ColorGroup::Pink, 140, &[10, 50, 150, 450, 625, 750], 100, 70),
    utility("Electric Company"),
    street("States Avenue", ColorGroup::Pink, 140, &[10, 50, 150, 450, 625, 750], 100, 70),
    street("Virginia Avenue", ColorGroup::Pink, 160, &[12, 60, 180, 500, 700, 900], 100, 80),
    railroad("Pennsylvania Railroad"),
    street("St. James Place", ColorGroup::Orange, 180, &[14, 70, 200, 550, 750, 950], 100, 90),
    Space { name: "Community Chest", kind: SpaceKind::CommunityChest },
    street("Tennessee Avenue", ColorGroup::Orange, 180, &[14, 70, 200, 550, 750, 950], 100, 90),
    street("New York Avenue", ColorGroup::Orange, 200, &[16, 80, 220, 600, 800, 1000], 100, 100),
    Space { name: "Free Parking", kind: SpaceKind::FreeParking },
    street("Kentucky Avenue", ColorGroup::Red, 220, &[18, 90, 250, 700, 875, 1050], 150, 110),
    Space { name: "Chance", kind: SpaceKind::Chance },
    street("Indiana Avenue", ColorGroup::Red, 220, &[18, 90, 250, 700, 875, 1050], 150, 110),
    street("Illinois Avenue", ColorGroup::Red, 240, &[20, 100, 300, 750, 925, 1100], 150, 120),
    railroad("B. & O. Railroad"),
    street("Atlantic Avenue", ColorGroup::Yellow, 260, &[22, 110, 330, 800, 975, 1150], 150, 130),
    street("Ventnor Avenue", ColorGroup::Yellow, 260, &[22, 110, 330, 800, 975, 1150], 150, 130),
    utility("Water Works"),
    street("Marvin Gardens", ColorGroup::Yellow, 280, &[24, 120, 360, 850, 1025, 1200], 150, 140),
    Space { name: "Go To Jail", kind: SpaceKind::GoToJail },
    street("Pacific Avenue", ColorGroup::Green, 300, &[26, 130, 390, 900, 1100, 1275], 200, 150),
    street(
        "North Carolina Avenue",
        ColorGroup::Green,
        300,
        &[26, 130, 390, 900, 1100, 1275],
        200,
        150,
    ),
    Space { name: "Community Chest", kind: SpaceKind::CommunityChest },
    street("Pennsylvania Avenue", ColorGroup::Green, 320, &[28, 150, 450, 1000, 1200, 1400], 200, 160),
    railroad("Short Line"),
    Space { name: "Chance", kind: SpaceKind::Chance },
    street("Park Place", ColorGroup::DarkBlue, 350, &[35, 175, 500, 1100, 1300, 1500], 200, 175),
    Space { name: "Luxury Tax", kind: SpaceKind::Tax { amount: 100 } },
    street("Boardwalk", ColorGroup::DarkBlue, 400, &[50, 200, 600, 1400, 1700, 2000], 200, 200),
];

static BOARD: Board = Board { spaces: &SPACES };

/// The fixed board catalog. Pure data; all mutable property state lives in
/// [`crate::state::GameState`].
#[derive(Debug)]
pub struct Board {
    spaces: &'static [Space],
}

impl Board {
    /// The standard US board.
    pub fn standard() -> &'static Board {
        &BOARD
    }

    pub fn space(&self, position: u8) -> &Space {
        &self.spaces[position as usize]
    }

    pub fn spaces(&self) -> &[Space] {
        self.spaces
    }

    /// Positions of every purchasable site, in board order.
    pub fn site_positions(&self) -> impl Iterator<Item = u8> + '_ {
        self.spaces.iter().enumerate().filter_map(|(i, s)| match s.kind {
            SpaceKind::Site { .. } => Some(i as u8),
            _ => None,
        })
    }

    /// Positions of every street in a color group.
    pub fn group_positions(&self, group: ColorGroup) -> Vec<u8> {
        self.spaces
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s.kind {
                SpaceKind::Site { class: PropertyClass::Street(g), .. } if g == group => {
                    Some(i as u8)
                }
                _ => None,
            })
            .collect()
    }

    /// The next position of the given class at or after `from`, wrapping.
    pub fn nearest_of_class(&self, from: u8, class: PropertyClass) -> u8 {
        let is_match = |pos: u8| match (self.space(pos).kind, class) {
            (SpaceKind::Site { class: PropertyClass::Railroad, .. }, PropertyClass::Railroad) => {
                true
            }
            (SpaceKind::Site { class: PropertyClass::Utility, .. }, PropertyClass::Utility) => true,
            _ => false,
        };
        let mut pos = (from + 1) % BOARD_SIZE;
        while pos != from {
            if is_match(pos) {
                return pos;
            }
            pos = (pos + 1) % BOARD_SIZE;
        }
        from
    }
}
