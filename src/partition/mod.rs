pub mod lineups;
