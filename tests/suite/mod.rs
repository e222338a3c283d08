mod containers;
mod cycles;
mod freeze;
mod json;
mod views;
