pub mod aggregate;
pub mod analysis;
pub mod decode;
pub mod descriptors;
pub mod features;
pub mod frames;
pub mod mel;
pub mod mfcc;
pub mod spectrum;
pub mod window;
