pub mod kitti_reader;
pub use kitti_reader::{KittiPoseReader, ReadError};
