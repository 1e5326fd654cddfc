//! Contains various structs used to measure differences and memory effects when being sorted

use rand::distr::Distribution as _;
use rand::seq::SliceRandom as _;

/// A trait for generalizing sorting data creation
pub trait Data<T: Sized + Ord + std::fmt::Debug> {
    /// Initialize a vector of the given size
    fn initialize(size: usize, rng: &mut impl rand::Rng) -> Vec<T>;
}

/// A uniform data distribution set
#[derive(Debug)]
pub struct UniformData<T>(std::marker::PhantomData<T>);

/// A uniformly random permutation of `0..size`
#[derive(Debug)]
pub struct PermutationData<T>(std::marker::PhantomData<T>);

/// Implement [`Data`] for the given integer types
macro_rules! impl_for_integers {
    ($($type:ty),*) => {
        $(
            impl_for_integers!(@single $type);
        )*
    };
    (@single $type:ty) => {
        impl Data<$type> for UniformData<$type> {
            fn initialize(size: usize, rng: &mut impl rand::Rng) -> Vec<$type> {
                rand::distr::Uniform::new(<$type>::MIN, <$type>::MAX)
                    .unwrap()
                    .sample_iter(rng)
                    .take(size)
                    .collect()
            }
        }

        impl Data<$type> for PermutationData<$type> {
            fn initialize(size: usize, rng: &mut impl rand::Rng) -> Vec<$type> {
                let mut values: Vec<$type> = (0..size as $type).collect();
                values.shuffle(rng);
                values
            }
        }
    }
}

// Implement the Data trait for the default integer types
impl_for_integers!(u8, u16, u32, u64, u128);
