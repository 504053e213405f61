pub mod config;
pub mod cutout;
pub mod devices;
pub mod frame;
pub mod framegrabber;
pub mod framesource;
pub mod intervaltimer;
pub mod olaoutput;
pub mod photonizer;
