/// Asserts that the animal with the given id is still in the world and alive.
#[macro_export]
macro_rules! assert_alive {
    ($clock:expr, $id:expr) => {
        let animal = $clock.animal($id).expect("Animal not found in world");
        assert!(animal.is_alive(), "Animal {} should be alive", $id);
    };
}

/// Asserts that the animal with the given id is gone (dead and swept, or removed).
#[macro_export]
macro_rules! assert_gone {
    ($clock:expr, $id:expr) => {
        assert!(
            $clock.animal($id).is_none(),
            "Animal {} should be gone but was found",
            $id
        );
    };
}

/// Asserts that the occupancy registry matches every animal's position.
#[macro_export]
macro_rules! assert_consistent {
    ($clock:expr) => {
        assert!(
            $clock.check_consistency(),
            "Occupancy registry out of sync at tick {}",
            $clock.tick_count()
        );
    };
}
