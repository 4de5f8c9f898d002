//! JVM access flags.

use bitflags::bitflags;

bitflags! {
    /// Class/method access and property flags.
    ///
    /// Bit values match the class-file format, so flag sets can be written
    /// straight into generated artifacts.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        /// Compiler-generated, not present in source.
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
    }
}
