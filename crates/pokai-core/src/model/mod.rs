pub mod card;
pub mod categories;
pub mod deck;
pub mod family;
pub mod generator;
pub mod hand;
pub mod play;
pub mod player;
pub mod rank;
pub mod round;
pub mod suit;
