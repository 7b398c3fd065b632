//! Liar's Dice table
//!
//! Bevy 2D front end for the `liarsdice-core` engine: sprites for the dice,
//! keyboard input and procedurally synthesized dice sounds.

pub mod dice2d;
