/// EXIF-style orientation of raw sensor pixel data.
///
/// Collaborators are configured independently: the segmenter and the face
/// detector of one pipeline may well use different orientations, so there is
/// no single shared constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Up,
    UpMirrored,
    Right,
    RightMirrored,
    Down,
    DownMirrored,
    Left,
    LeftMirrored,
}

impl Orientation {
    /// The quarter-turn needed to bring sensor data into this orientation.
    pub fn rotation(self) -> Rotation {
        match self {
            Orientation::Up | Orientation::UpMirrored => Rotation::None,
            Orientation::Right | Orientation::RightMirrored => Rotation::Quarter,
            Orientation::Down | Orientation::DownMirrored => Rotation::Half,
            Orientation::Left | Orientation::LeftMirrored => Rotation::ThreeQuarter,
        }
    }

    /// Whether a horizontal flip follows the rotation.
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            Orientation::UpMirrored
                | Orientation::RightMirrored
                | Orientation::DownMirrored
                | Orientation::LeftMirrored
        )
    }
}

/// A clockwise quarter-turn rotation of pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// The rotation that undoes this one.
    pub fn inverse(self) -> Rotation {
        match self {
            Rotation::None => Rotation::None,
            Rotation::Quarter => Rotation::ThreeQuarter,
            Rotation::Half => Rotation::Half,
            Rotation::ThreeQuarter => Rotation::Quarter,
        }
    }

    /// Whether this rotation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Quarter | Rotation::ThreeQuarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Orientation::Up, Rotation::None, false)]
    #[case(Orientation::Right, Rotation::Quarter, false)]
    #[case(Orientation::Down, Rotation::Half, false)]
    #[case(Orientation::Left, Rotation::ThreeQuarter, false)]
    #[case(Orientation::UpMirrored, Rotation::None, true)]
    #[case(Orientation::LeftMirrored, Rotation::ThreeQuarter, true)]
    fn test_rotation_and_mirror(
        #[case] orientation: Orientation,
        #[case] rotation: Rotation,
        #[case] mirrored: bool,
    ) {
        assert_eq!(orientation.rotation(), rotation);
        assert_eq!(orientation.is_mirrored(), mirrored);
    }

    #[rstest]
    #[case(Rotation::None, Rotation::None)]
    #[case(Rotation::Quarter, Rotation::ThreeQuarter)]
    #[case(Rotation::Half, Rotation::Half)]
    #[case(Rotation::ThreeQuarter, Rotation::Quarter)]
    fn test_inverse(#[case] rotation: Rotation, #[case] inverse: Rotation) {
        assert_eq!(rotation.inverse(), inverse);
    }

    #[test]
    fn test_swaps_axes() {
        assert!(!Rotation::None.swaps_axes());
        assert!(Rotation::Quarter.swaps_axes());
        assert!(!Rotation::Half.swaps_axes());
        assert!(Rotation::ThreeQuarter.swaps_axes());
    }
}
